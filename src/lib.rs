// src/lib.rs
//! Account payload validation service.
//!
//! Declared per-field rules, optionally scoped to a group, are evaluated
//! by one generic evaluator; every failure is reported to clients in the
//! same `{ message, violations }` shape.

pub mod accounts;
pub mod common;
pub mod logging_middleware;

use axum::{extract::Extension, middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use common::AppState;

/// Compose the full application router from shared state
pub fn app(state: AppState) -> Router {
    let origins: Vec<axum::http::HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let log_bodies = state.config.log_bodies;

    let mut router = accounts::accounts_routes();

    // Request/response body logging, opt-in
    if log_bodies {
        router = router.layer(middleware::from_fn(logging_middleware::log_request_response));
    }

    router
        .layer(Extension(Arc::new(state)))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}
