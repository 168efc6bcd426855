// src/accounts/models.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Reads a missing or null number as 0
fn deserialize_int_or_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<i32> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or(0))
}

/// Account payload shared by every `/user` body endpoint.
/// Which rules apply is chosen per call by a `ValidationProfile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub password: Option<String>,
    pub username: Option<String>,
    /// Missing or null on the wire reads as 0
    #[serde(default, deserialize_with = "deserialize_int_or_zero")]
    pub age: i32,
    pub owned_products: Option<Vec<ProductRecord>>,
    pub owned_products_map: Option<BTreeMap<String, ProductRecord>>,
    pub account_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub returned_products_count: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<i64>,
}

/// Query string of `GET /user/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetInfoParams {
    pub active: Option<String>,
}

/// Path id and query of `GET /user/:id`, checked together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLookup {
    pub id: String,
    pub active: Option<String>,
}
