//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::SignalError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<SignalError> for ApiError {
    fn from(err: SignalError) -> Self {
        let status = match &err {
            SignalError::DataUnavailable { .. } => StatusCode::NOT_FOUND,
            SignalError::InsufficientHistory { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. }
            | SignalError::ConfigParse { .. }
            | SignalError::Watchlist { .. } => StatusCode::BAD_REQUEST,
            SignalError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
