//! Error types for the DocuSeal proxy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docuseal_types::DecodeError;
use serde_json::{json, Value};
use thiserror::Error;

pub const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Rejected before reaching DocuSeal. `received` echoes the offending body.
    #[error("{message}")]
    InvalidRequest {
        message: String,
        received: Option<Value>,
    },

    /// DocuSeal answered with a non-success status
    #[error("DocuSeal returned {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            received: None,
        }
    }
}

fn internal_error(error: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal Server Error", "error": error.to_string() })),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message })))
            }
            ApiError::InvalidRequest { message, received } => {
                tracing::warn!("Rejected request: {}", message);
                let body = match received {
                    Some(received) => json!({ "message": message, "received": received }),
                    None => json!({ "message": message }),
                };
                (StatusCode::BAD_REQUEST, Json(body))
            }
            ApiError::Upstream { status, body } => {
                tracing::error!("DocuSeal error {}: {}", status, body);
                (status, Json(body))
            }
            ApiError::Decode(e) => {
                tracing::error!("Unexpected DocuSeal response: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "message": "Unexpected response from DocuSeal",
                        "error": e.to_string(),
                    })),
                )
            }
            ApiError::Transport(e) => {
                tracing::error!("DocuSeal request failed: {}", e);
                internal_error(e)
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                internal_error(e)
            }
        };

        (status, body).into_response()
    }
}
