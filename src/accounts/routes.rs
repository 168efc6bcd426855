// src/accounts/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the accounts router with all `/user` routes
pub fn accounts_routes() -> Router {
    Router::new()
        .route("/user/add-all-info", post(handlers::add_all_info))
        .route("/user/add-basic-info", post(handlers::add_basic_info))
        .route("/user/add-advanced-info", post(handlers::add_advanced_info))
        .route("/user/add-all-info-2", post(handlers::add_all_info_default))
        .route("/user/:id", get(handlers::get_info))
        .fallback(handlers::not_found)
}
