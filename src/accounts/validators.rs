// src/accounts/validators.rs

use super::models::*;
use crate::common::validation::{
    has_length_between, is_not_blank, is_present, text_length, RuleSet, Scope,
};
use crate::common::Group;
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

pub const MUST_NOT_BE_NULL: &str = "must not be null";
pub const MUST_NOT_BE_BLANK: &str = "must not be blank";
pub const PASSWORD_SIZE: &str = "size must be between 4 and 15";
pub const AGE_TOO_LOW: &str = "Age should not be less than 18";
pub const ACCOUNT_ID_MISMATCH: &str = "must match \"^ACCOUNT-\"";
pub const INVALID_DATE_OF_BIRTH: &str = "Invalid Date Of Birth. Expected MM/dd/yyyy";
pub const MUST_BE_POSITIVE: &str = "must be greater than 0";
pub const AT_LEAST_ONE: &str = "must be greater than or equal to 1";
pub const ID_SIZE: &str = "size must be between 4 and 5";
pub const ACTIVE_SIZE: &str = "size must be between 2 and 2147483647";

const ACCOUNT_ID_PATTERN: &str = "^ACCOUNT-";

/// Whether `ProductRecord.name` is always required or only under AdvanceInfo.
/// The two historical declarations of the product payload disagree, so this
/// stays a deployment choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductNameRule {
    #[default]
    AdvanceInfoOnly,
    Unconditional,
}

impl ProductNameRule {
    fn scope(&self) -> Scope {
        match self {
            ProductNameRule::AdvanceInfoOnly => Scope::Group(Group::AdvanceInfo),
            ProductNameRule::Unconditional => Scope::Default,
        }
    }
}

// ============================================================================
// Product Rules
// ============================================================================

pub fn product_rules(name_rule: ProductNameRule) -> RuleSet<ProductRecord> {
    RuleSet::new()
        .rule("id", Scope::Default, MUST_NOT_BE_BLANK, |p: &ProductRecord| {
            is_not_blank(&p.id)
        })
        .rule("name", name_rule.scope(), MUST_NOT_BE_BLANK, |p: &ProductRecord| {
            is_not_blank(&p.name)
        })
        .rule("quantity", Scope::Default, MUST_BE_POSITIVE, |p: &ProductRecord| {
            p.quantity.map_or(true, |q| q > 0)
        })
}

// ============================================================================
// Account Rules
// ============================================================================

/// Rules for `AccountRecord`.
///
/// Validated with `ValidationProfile::AllGroups` this is the ungrouped
/// account shape; with `BasicInfo` or `AdvanceInfo` only that group's rules
/// run; with `Default` only `returnedProductsCount` is enforced.
pub fn account_rules(name_rule: ProductNameRule) -> Result<RuleSet<AccountRecord>, regex::Error> {
    let account_id_pattern = Regex::new(ACCOUNT_ID_PATTERN)?;
    let basic = Scope::Group(Group::BasicInfo);
    let advance = Scope::Group(Group::AdvanceInfo);

    let rules = RuleSet::new()
        // BasicInfo
        .rule("password", basic, MUST_NOT_BE_NULL, |a: &AccountRecord| {
            is_present(&a.password)
        })
        .rule("password", basic, PASSWORD_SIZE, |a: &AccountRecord| {
            has_length_between(&a.password, 4, 15)
        })
        .rule("username", basic, MUST_NOT_BE_BLANK, |a: &AccountRecord| {
            is_not_blank(&a.username)
        })
        // AdvanceInfo
        .rule("age", advance, AGE_TOO_LOW, |a: &AccountRecord| a.age >= 18)
        .rule("accountId", advance, ACCOUNT_ID_MISMATCH, move |a: &AccountRecord| {
            a.account_id
                .as_deref()
                .map_or(true, |id| account_id_pattern.is_match(id))
        })
        .rule("dateOfBirth", advance, INVALID_DATE_OF_BIRTH, |a: &AccountRecord| {
            is_valid_date_of_birth(a.date_of_birth.as_deref())
        })
        .rule("returnedProductsCount", Scope::Always, MUST_NOT_BE_NULL, |a: &AccountRecord| {
            is_present(&a.returned_products_count)
        })
        .rule("returnedProductsCount", Scope::Always, AT_LEAST_ONE, |a: &AccountRecord| {
            a.returned_products_count.map_or(true, |n| n >= 1)
        })
        .cascade_each(
            "ownedProducts",
            |a: &AccountRecord| a.owned_products.as_ref(),
            product_rules(name_rule),
        )
        .cascade_values(
            "ownedProductsMap",
            |a: &AccountRecord| a.owned_products_map.as_ref(),
            product_rules(name_rule),
        );

    Ok(rules)
}

// ============================================================================
// Path and Query Parameter Rules
// ============================================================================

pub fn info_lookup_rules() -> RuleSet<InfoLookup> {
    RuleSet::new()
        .rule("id", Scope::Default, ID_SIZE, |l: &InfoLookup| {
            (4..=5).contains(&text_length(&l.id))
        })
        .rule("active", Scope::Default, ACTIVE_SIZE, |l: &InfoLookup| {
            l.active.as_deref().map_or(true, |a| text_length(a) >= 2)
        })
}

// ============================================================================
// Date of Birth
// ============================================================================

#[derive(Debug, Error)]
enum DateOfBirthError {
    #[error("expected MM/dd/yyyy, got {0} characters")]
    Length(usize),
    #[error("unexpected character '{found}' at position {position}")]
    Shape { position: usize, found: char },
    #[error("not a calendar date: {0}")]
    Calendar(#[from] chrono::ParseError),
}

/// Strict `MM/dd/yyyy` check. Absent values pass; requiring the field is a
/// separate rule.
pub fn is_valid_date_of_birth(value: Option<&str>) -> bool {
    let Some(raw) = value else {
        return true;
    };

    match parse_date_of_birth(raw) {
        Ok(_) => true,
        Err(e) => {
            debug!(value = %raw, error = %e, "Rejected date of birth");
            false
        }
    }
}

fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, DateOfBirthError> {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() != 10 {
        return Err(DateOfBirthError::Length(chars.len()));
    }

    for (position, &c) in chars.iter().enumerate() {
        let ok = match position {
            2 | 5 => c == '/',
            _ => c.is_ascii_digit(),
        };
        if !ok {
            return Err(DateOfBirthError::Shape { position, found: c });
        }
    }

    Ok(NaiveDate::parse_from_str(raw, "%m/%d/%Y")?)
}
