// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Summary carried by every violation report
pub const VIOLATION_SUMMARY: &str = "Some fields are not valid";

// ============================================================================
// Validation Failures
// ============================================================================

/// A field that failed whole-record validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub default_message: String,
}

/// A property path that failed targeted validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyViolation {
    pub property_path: String,
    pub message: String,
}

/// The two ways a validation call reports failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Whole-record validation of a request body
    Binding(Vec<FieldError>),
    /// Group-scoped body validation, or path/query parameter checks
    Property(Vec<PropertyViolation>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationView {
    pub field_name: String,
    pub message: String,
}

/// Uniform client-facing shape for either failure kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    pub message: String,
    pub violations: Vec<ViolationView>,
}

impl Default for ViolationReport {
    fn default() -> Self {
        Self {
            message: VIOLATION_SUMMARY.to_string(),
            violations: Vec::new(),
        }
    }
}

impl From<ValidationFailure> for ViolationReport {
    fn from(failure: ValidationFailure) -> Self {
        let mut report = ViolationReport::default();
        match failure {
            ValidationFailure::Binding(errors) => {
                for e in errors {
                    report.violations.push(ViolationView {
                        field_name: e.field,
                        message: e.default_message,
                    });
                }
            }
            ValidationFailure::Property(violations) => {
                for v in violations {
                    report.violations.push(ViolationView {
                        field_name: v.property_path,
                        message: v.message,
                    });
                }
            }
        }
        report
    }
}

// ============================================================================
// API Errors
// ============================================================================

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Validation(ViolationReport),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Validation(report) => write!(
                f,
                "Validation Error: {} ({} violations)",
                report.message,
                report.violations.len()
            ),
        }
    }
}

impl std::error::Error for ApiError {}

/// JSON error response structure for non-validation failures
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Validation(report) => {
                warn!(violations = report.violations.len(), "Rejecting request with invalid fields");
                return (StatusCode::BAD_REQUEST, Json(report)).into_response();
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure.into())
    }
}
