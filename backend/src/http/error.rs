//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::selection::InvalidObjectTypes;
use crate::services::ParseError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request body over the configured limit
    PayloadTooLarge(String),
    /// Parse pipeline error
    Parse(ParseError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Parse(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::PayloadTooLarge(msg) => ApiError::new("PAYLOAD_TOO_LARGE", msg.clone()),
            AppError::Parse(e) => {
                let body = ApiError::new(e.code(), e.to_string());
                match e {
                    ParseError::InvalidObjectTypes(invalid) => {
                        body.with_details(format!("valid: {}", invalid.valid.join(",")))
                    }
                    ParseError::Extraction { object_type, .. } => {
                        body.with_details(format!("object_type: {}", object_type))
                    }
                    _ => body,
                }
            }
        };

        if status.is_server_error() {
            error!(code = %body.code, message = %body.message, "request failed");
        } else {
            warn!(code = %body.code, message = %body.message, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Parse(err)
    }
}

impl From<InvalidObjectTypes> for AppError {
    fn from(err: InvalidObjectTypes) -> Self {
        AppError::Parse(err.into())
    }
}
