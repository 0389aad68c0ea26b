//! Token for the embedded DocuSeal template builder

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::auth;
use crate::AppState;

/// Mint a one-hour builder token signed with the DocuSeal API key
pub async fn builder_token(State(state): State<Arc<AppState>>) -> Response {
    let signed = auth::builder_token(
        state.config.user_email.as_deref(),
        state.config.api_key(),
        auth::now(),
    );

    match signed {
        Ok(token) => Json(json!({ "token": token })).into_response(),
        Err(e) => {
            error!("Failed to sign builder token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate token" })),
            )
                .into_response()
        }
    }
}
