use super::models::{AccountRecord, GetInfoParams, InfoLookup};
use super::validators::info_lookup_rules;
use crate::common::{ApiError, AppState, ValidationProfile};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Account Body Handlers
// ============================================================================

/// POST /user/add-all-info - Every account rule, nested products included
pub async fn add_all_info(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AccountRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload.map_err(reject_body)?;

    state
        .account_rules
        .validate(&record, ValidationProfile::AllGroups)
        .into_binding_failure()?;

    info!("Accepted full account info");
    Ok(StatusCode::OK)
}

/// POST /user/add-basic-info - BasicInfo rules only
pub async fn add_basic_info(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AccountRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload.map_err(reject_body)?;

    state
        .account_rules
        .validate(&record, ValidationProfile::BasicInfo)
        .into_property_failure()?;

    info!("Accepted basic account info");
    Ok(StatusCode::OK)
}

/// POST /user/add-advanced-info - AdvanceInfo rules only
pub async fn add_advanced_info(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AccountRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload.map_err(reject_body)?;

    state
        .account_rules
        .validate(&record, ValidationProfile::AdvanceInfo)
        .into_property_failure()?;

    info!("Accepted advanced account info");
    Ok(StatusCode::OK)
}

/// POST /user/add-all-info-2 - Default profile.
/// Nearly every account rule is group scoped, so only
/// `returnedProductsCount` and the nested products are checked here.
pub async fn add_all_info_default(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AccountRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload.map_err(reject_body)?;

    state
        .account_rules
        .validate(&record, ValidationProfile::Default)
        .into_binding_failure()?;

    info!("Accepted account info under default rules");
    Ok(StatusCode::OK)
}

// ============================================================================
// Lookup Handler
// ============================================================================

/// GET /user/:id?active= - Path and query parameter checks
pub async fn get_info(
    Path(id): Path<String>,
    query: Result<Query<GetInfoParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let lookup = InfoLookup {
        id,
        active: params.active,
    };

    info_lookup_rules()
        .validate(&lookup, ValidationProfile::Default)
        .into_property_failure()?;

    info!(id = %lookup.id, "Accepted info lookup");
    Ok(StatusCode::OK)
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}
