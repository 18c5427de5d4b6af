use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::ServiceError;

pub mod activities;
pub mod admin;
pub mod auth;
pub mod public;
pub mod reviewer;

/// Fallback mapping for service errors a handler has no better answer
/// for. Validation rejections should have been routed back to the form
/// before reaching this.
pub(crate) fn error_response(context: &str, err: ServiceError) -> Response {
    match err {
        ServiceError::NotFound => StatusCode::NOT_FOUND.into_response(),
        ServiceError::Forbidden => StatusCode::FORBIDDEN.into_response(),
        ServiceError::Rejected(_) => StatusCode::BAD_REQUEST.into_response(),
        other => {
            error!("{context}: {other:?}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
