use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::HttpError;

/// Turn the outcome of a tonic handler into a JSON HTTP response.
pub fn respond<T: Serialize>(result: Result<tonic::Response<T>, tonic::Status>) -> Response {
    match result {
        Ok(response) => Json(response.into_inner()).into_response(),
        Err(status) => {
            let err = HttpError::from_status(&status);
            if err.status().is_server_error() {
                tracing::warn!(code = ?status.code(), message = status.message(), "handler failed");
            }
            err.into_response()
        }
    }
}
