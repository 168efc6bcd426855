// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ValidationFailure, ViolationReport};
pub use state::AppState;
pub use validation::{
    Group, RuleSet, Scope, UnknownGroupPolicy, ValidationProfile, ValidationResult, Validator,
};
