// Common validation types, rule tables and the group-aware evaluator

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::error::{FieldError, PropertyViolation, ValidationFailure};

// ============================================================================
// Groups, Scopes and Profiles
// ============================================================================

/// Named validation group a rule can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    BasicInfo,
    AdvanceInfo,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::BasicInfo => "BasicInfo",
            Group::AdvanceInfo => "AdvanceInfo",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation group '{0}'")]
pub struct UnknownGroup(pub String);

impl FromStr for Group {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basicinfo" => Ok(Group::BasicInfo),
            "advanceinfo" => Ok(Group::AdvanceInfo),
            _ => Err(UnknownGroup(s.to_string())),
        }
    }
}

/// Where a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// No explicit group: checked under the default profile
    Default,
    /// Checked only when the named group is requested
    Group(Group),
    /// Checked on every call, whatever was requested
    Always,
}

/// Which subset of a rule table a validation call activates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationProfile {
    Default,
    /// Every declared rule, group scoping erased
    AllGroups,
    BasicInfo,
    AdvanceInfo,
}

impl ValidationProfile {
    pub fn includes(&self, scope: Scope) -> bool {
        match (scope, *self) {
            (Scope::Always, _) => true,
            (_, ValidationProfile::AllGroups) => true,
            (Scope::Default, ValidationProfile::Default) => true,
            (Scope::Group(Group::BasicInfo), ValidationProfile::BasicInfo) => true,
            (Scope::Group(Group::AdvanceInfo), ValidationProfile::AdvanceInfo) => true,
            _ => false,
        }
    }
}

impl From<Group> for ValidationProfile {
    fn from(group: Group) -> Self {
        match group {
            Group::BasicInfo => ValidationProfile::BasicInfo,
            Group::AdvanceInfo => ValidationProfile::AdvanceInfo,
        }
    }
}

/// What to do with a group name no rule table knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownGroupPolicy {
    /// Nothing matches, so only `Scope::Always` rules run
    #[default]
    Ignore,
    Reject,
}

// ============================================================================
// Results
// ============================================================================

/// One failed rule on one field or element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<Violation>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(Violation {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Merge a nested element's result, prefixing each path with `prefix.`
    pub fn add_nested(&mut self, prefix: &str, nested: ValidationResult) {
        for violation in nested.errors {
            self.add_error(&format!("{}.{}", prefix, violation.field), &violation.message);
        }
    }

    /// Whole-record failures, reported per field
    pub fn into_binding_failure(self) -> Result<(), ValidationFailure> {
        if self.is_valid {
            return Ok(());
        }
        Err(ValidationFailure::Binding(
            self.errors
                .into_iter()
                .map(|v| FieldError {
                    field: v.field,
                    default_message: v.message,
                })
                .collect(),
        ))
    }

    /// Targeted failures (groups, path and query parameters), reported per property path
    pub fn into_property_failure(self) -> Result<(), ValidationFailure> {
        if self.is_valid {
            return Ok(());
        }
        Err(ValidationFailure::Property(
            self.errors
                .into_iter()
                .map(|v| PropertyViolation {
                    property_path: v.field,
                    message: v.message,
                })
                .collect(),
        ))
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T, profile: ValidationProfile) -> ValidationResult;
}

// ============================================================================
// Rule Tables
// ============================================================================

type Check<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Visit<T> = Box<dyn Fn(&T, &mut ValidationResult) + Send + Sync>;

pub struct Rule<T> {
    pub field: &'static str,
    pub scope: Scope,
    pub message: &'static str,
    check: Check<T>,
}

impl<T> Rule<T> {
    pub fn passes(&self, data: &T) -> bool {
        (self.check)(data)
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("scope", &self.scope)
            .field("message", &self.message)
            .finish()
    }
}

struct Cascade<T> {
    field: &'static str,
    visit: Visit<T>,
}

/// Declared rules for one record type, plus the nested fields it cascades into
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
    cascades: Vec<Cascade<T>>,
}

impl<T: 'static> RuleSet<T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            cascades: Vec::new(),
        }
    }

    pub fn rule<F>(mut self, field: &'static str, scope: Scope, message: &'static str, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            field,
            scope,
            message,
            check: Box::new(check),
        });
        self
    }

    /// Validate every element of a sequence field as `field[i].child`
    pub fn cascade_each<N, G>(mut self, field: &'static str, get: G, nested: RuleSet<N>) -> Self
    where
        N: 'static,
        G: Fn(&T) -> Option<&Vec<N>> + Send + Sync + 'static,
    {
        let visit = move |data: &T, result: &mut ValidationResult| {
            if let Some(items) = get(data) {
                for (index, item) in items.iter().enumerate() {
                    let nested_result = nested.validate(item, ValidationProfile::Default);
                    result.add_nested(&format!("{}[{}]", field, index), nested_result);
                }
            }
        };
        self.cascades.push(Cascade {
            field,
            visit: Box::new(visit),
        });
        self
    }

    /// Validate every value of a mapping field as `field[key].child`
    pub fn cascade_values<N, G>(mut self, field: &'static str, get: G, nested: RuleSet<N>) -> Self
    where
        N: 'static,
        G: Fn(&T) -> Option<&BTreeMap<String, N>> + Send + Sync + 'static,
    {
        let visit = move |data: &T, result: &mut ValidationResult| {
            if let Some(entries) = get(data) {
                for (key, item) in entries {
                    let nested_result = nested.validate(item, ValidationProfile::Default);
                    result.add_nested(&format!("{}[{}]", field, key), nested_result);
                }
            }
        };
        self.cascades.push(Cascade {
            field,
            visit: Box::new(visit),
        });
        self
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    pub fn cascaded_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cascades.iter().map(|c| c.field)
    }

    /// Top-level rules in declaration order, then cascades in declaration order
    pub fn validate(&self, data: &T, profile: ValidationProfile) -> ValidationResult {
        self.evaluate(data, |scope| profile.includes(scope))
    }

    /// Validate against a group given by name
    pub fn validate_named(
        &self,
        data: &T,
        group_name: &str,
        policy: UnknownGroupPolicy,
    ) -> Result<ValidationResult, UnknownGroup> {
        match group_name.parse::<Group>() {
            Ok(group) => Ok(self.validate(data, group.into())),
            Err(unknown) => match policy {
                UnknownGroupPolicy::Reject => Err(unknown),
                UnknownGroupPolicy::Ignore => {
                    tracing::warn!(group = %unknown.0, "Unknown validation group, no group rules matched");
                    Ok(self.evaluate(data, |scope| scope == Scope::Always))
                }
            },
        }
    }

    fn evaluate<P>(&self, data: &T, active: P) -> ValidationResult
    where
        P: Fn(Scope) -> bool,
    {
        let mut result = ValidationResult::new();

        for rule in self.rules.iter().filter(|r| active(r.scope)) {
            if !rule.passes(data) {
                result.add_error(rule.field, rule.message);
            }
        }

        for cascade in &self.cascades {
            (cascade.visit)(data, &mut result);
        }

        result
    }
}

impl<T: 'static> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Validator<T> for RuleSet<T> {
    fn validate(&self, data: &T, profile: ValidationProfile) -> ValidationResult {
        RuleSet::validate(self, data, profile)
    }
}

// ============================================================================
// Field Checks
// ============================================================================

pub fn is_present<V>(value: &Option<V>) -> bool {
    value.is_some()
}

/// Absent or whitespace-only strings are blank
pub fn is_not_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |s| !s.trim().is_empty())
}

/// Length in UTF-16 code units, so characters outside the BMP count twice
pub fn text_length(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Absent values pass
pub fn has_length_between(value: &Option<String>, min: usize, max: usize) -> bool {
    value.as_deref().map_or(true, |s| {
        let len = text_length(s);
        len >= min && len <= max
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Item {
        code: Option<String>,
    }

    #[derive(Default)]
    struct Holder {
        a: Option<String>,
        b: Option<String>,
        c: Option<String>,
        items: Option<Vec<Item>>,
        by_key: Option<BTreeMap<String, Item>>,
    }

    fn item_rules() -> RuleSet<Item> {
        RuleSet::new().rule("code", Scope::Default, "must not be blank", |i: &Item| {
            is_not_blank(&i.code)
        })
    }

    fn holder_rules() -> RuleSet<Holder> {
        RuleSet::new()
            .rule("a", Scope::Group(Group::BasicInfo), "a missing", |h: &Holder| is_present(&h.a))
            .rule("b", Scope::Group(Group::AdvanceInfo), "b missing", |h: &Holder| is_present(&h.b))
            .rule("c", Scope::Always, "c missing", |h: &Holder| is_present(&h.c))
            .cascade_each("items", |h: &Holder| h.items.as_ref(), item_rules())
            .cascade_values("byKey", |h: &Holder| h.by_key.as_ref(), item_rules())
    }

    fn fields(result: &ValidationResult) -> Vec<&str> {
        result.errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_profile_inclusion() {
        assert!(ValidationProfile::Default.includes(Scope::Default));
        assert!(ValidationProfile::Default.includes(Scope::Always));
        assert!(!ValidationProfile::Default.includes(Scope::Group(Group::BasicInfo)));
        assert!(!ValidationProfile::BasicInfo.includes(Scope::Default));
        assert!(!ValidationProfile::BasicInfo.includes(Scope::Group(Group::AdvanceInfo)));
        assert!(ValidationProfile::AdvanceInfo.includes(Scope::Group(Group::AdvanceInfo)));
        assert!(ValidationProfile::AllGroups.includes(Scope::Group(Group::BasicInfo)));
        assert!(ValidationProfile::AllGroups.includes(Scope::Default));
    }

    #[test]
    fn test_group_isolation() {
        let result = holder_rules().validate(&Holder::default(), ValidationProfile::BasicInfo);
        assert_eq!(fields(&result), vec!["a", "c"]);

        let result = holder_rules().validate(&Holder::default(), ValidationProfile::AdvanceInfo);
        assert_eq!(fields(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_always_rule_runs_under_default() {
        let result = holder_rules().validate(&Holder::default(), ValidationProfile::Default);
        assert!(!result.is_valid);
        assert_eq!(fields(&result), vec!["c"]);
    }

    #[test]
    fn test_cascade_paths_follow_traversal() {
        let holder = Holder {
            c: Some("ok".to_string()),
            items: Some(vec![
                Item { code: Some("x".to_string()) },
                Item { code: Some(" ".to_string()) },
            ]),
            by_key: Some(BTreeMap::from([
                ("beta".to_string(), Item::default()),
                ("alpha".to_string(), Item::default()),
            ])),
            ..Holder::default()
        };

        let result = holder_rules().validate(&holder, ValidationProfile::Default);
        assert_eq!(
            fields(&result),
            vec!["items[1].code", "byKey[alpha].code", "byKey[beta].code"]
        );
    }

    #[test]
    fn test_cascade_ignores_parent_group() {
        let holder = Holder {
            a: Some("a".to_string()),
            c: Some("c".to_string()),
            items: Some(vec![Item::default()]),
            ..Holder::default()
        };

        let result = holder_rules().validate(&holder, ValidationProfile::BasicInfo);
        assert_eq!(fields(&result), vec!["items[0].code"]);
    }

    #[test]
    fn test_group_names_parse() {
        assert_eq!("BasicInfo".parse::<Group>(), Ok(Group::BasicInfo));
        assert_eq!("advanceinfo".parse::<Group>(), Ok(Group::AdvanceInfo));
        assert!("Extra".parse::<Group>().is_err());
    }

    #[test]
    fn test_unknown_group_ignored() {
        let result = holder_rules()
            .validate_named(&Holder::default(), "NoSuchGroup", UnknownGroupPolicy::Ignore)
            .expect("ignore policy never fails");
        assert_eq!(fields(&result), vec!["c"]);
    }

    #[test]
    fn test_unknown_group_rejected() {
        let err = holder_rules()
            .validate_named(&Holder::default(), "NoSuchGroup", UnknownGroupPolicy::Reject)
            .unwrap_err();
        assert_eq!(err, UnknownGroup("NoSuchGroup".to_string()));
    }

    #[test]
    fn test_known_group_by_name() {
        let result = holder_rules()
            .validate_named(&Holder::default(), "AdvanceInfo", UnknownGroupPolicy::Reject)
            .expect("known group");
        assert_eq!(fields(&result), vec!["b", "c"]);
    }

    fn count_violations<V: Validator<Holder>>(validator: &V, holder: &Holder) -> usize {
        validator.validate(holder, ValidationProfile::AllGroups).errors.len()
    }

    #[test]
    fn test_rule_set_as_validator() {
        assert_eq!(count_violations(&holder_rules(), &Holder::default()), 3);
    }

    #[test]
    fn test_length_and_blank_checks() {
        assert!(has_length_between(&None, 4, 15));
        assert!(has_length_between(&Some("abcd".to_string()), 4, 15));
        assert!(!has_length_between(&Some("abc".to_string()), 4, 15));
        assert!(has_length_between(&Some("\u{1F600}\u{1F600}".to_string()), 4, 15));
        assert!(!has_length_between(&Some("\u{1F600}".to_string()), 4, 15));
        assert_eq!(text_length("é\u{1F600}"), 3);
        assert!(!is_not_blank(&None));
        assert!(!is_not_blank(&Some("   ".to_string())));
        assert!(is_not_blank(&Some("x".to_string())));
    }

    #[test]
    fn test_failure_conversion_keeps_order() {
        let mut result = ValidationResult::new();
        result.add_error("z", "first");
        result.add_error("a", "second");

        match result.into_property_failure() {
            Err(ValidationFailure::Property(items)) => {
                let paths: Vec<_> = items.iter().map(|v| v.property_path.as_str()).collect();
                assert_eq!(paths, vec!["z", "a"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(ValidationResult::new().into_binding_failure().is_ok());
    }
}
