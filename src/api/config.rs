//! Client config endpoint
//!
//! GET /app/get-config

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::schemas::ClientConfig;
use crate::server::state::AppState;

/// Return the stored client configuration as JSON
///
/// The storage location comes from settings; if it is incomplete the
/// request fails before any storage call is made.
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ClientConfig>, ApiError> {
    let location = state
        .settings
        .storage_location()
        .ok_or(ApiError::StorageLocationMissing)?;

    let config = state
        .config_source
        .fetch(&location)
        .await
        .map_err(|e| {
            tracing::warn!(location = %location, error = %e, "Client config fetch failed");
            ApiError::Fetch(e)
        })?;

    Ok(Json(config))
}
