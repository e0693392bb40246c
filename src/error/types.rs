//! API error types
//!
//! Errors surfaced to HTTP clients are rendered as plain text carrying the
//! proximate cause, never internal state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::settings::{BUCKET_NAME_VAR, FILE_NAME_VAR};
use crate::services::FetchError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{} or {} not set in environment variables", BUCKET_NAME_VAR, FILE_NAME_VAR)]
    StorageLocationMissing,

    #[error("Error fetching client config: {0}")]
    Fetch(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // String bodies are sent as text/plain; charset=utf-8
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
