//! API error type and JSON error response formatting.
//!
//! The transport contract is a flat `{ "error": string }` body: 400 for
//! missing or empty input, 500 for any internal failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use maitre_core::error::MaitreError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API error type that maps to HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 500 Internal Server Error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<MaitreError> for ApiError {
    fn from(err: MaitreError) -> Self {
        match &err {
            MaitreError::EmptyMessage => ApiError::BadRequest(err.to_string()),
            MaitreError::Config(msg) | MaitreError::KnowledgeBase(msg) => {
                ApiError::BadRequest(msg.clone())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
