use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::error::Error;
use std::fmt;

#[derive(Serialize, Debug)]
pub struct ErrorMessage {
    pub code: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Errors rendered by the router itself: unknown paths, wrong methods and
/// caught panics. A failed verification is a verdict, not an `ApiError`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    MethodNotAllowed,
    ServerError(String),
}

impl ApiError {
    fn code(&self) -> u16 {
        use ApiError::*;

        match self {
            NotFound(_) => 404,
            MethodNotAllowed => 405,
            ServerError(_) => 500,
        }
    }

    fn reason(&self) -> &str {
        StatusCode::from_u16(self.code())
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown error")
    }

    fn message(&self) -> Option<String> {
        use ApiError::*;

        match self {
            NotFound(msg) => Some(msg.clone()),
            // never echo panic payloads back to the client
            MethodNotAllowed | ServerError(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorMessage {
            code,
            error: self.reason().to_string(),
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ServerError(detail) => write!(f, "{}: {}", self.reason(), detail),
            _ => write!(f, "{}", self.reason()),
        }
    }
}

impl Error for ApiError {}

pub fn not_found(msg: &str) -> ApiError {
    ApiError::NotFound(msg.to_string())
}
