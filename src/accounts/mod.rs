//! # Accounts Module
//!
//! The `/user` endpoints: account payloads checked whole, per group, or
//! under the default rules, plus path/query parameter checks.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use models::*;
pub use routes::accounts_routes;
