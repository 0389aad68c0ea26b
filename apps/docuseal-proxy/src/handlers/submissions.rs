//! `/api/docuseal/submissions` routes

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    Json,
};
use docuseal_types::{
    check, check_page, Checked, CreateSubmissionRequest, Page, StatusFilter, Submission,
    ValidationError,
};
use serde_json::{json, Value};
use tracing::info;

use super::{json_body, parse_id};
use crate::auth::{MaybeSession, RequireSession};
use crate::error::ApiError;
use crate::upstream::{parse_json, Payload, AUTH_HEADER};
use crate::AppState;

/// Query keys forwarded as-is whenever present
const PASSTHROUGH: [&str; 3] = ["after", "before", "template_id"];
const FILTERS: [&str; 4] = ["q", "slug", "template_folder", "archived"];

/// Upstream query for a submissions listing
pub fn list_query(params: &HashMap<String, String>) -> Vec<(&'static str, String)> {
    let limit = params
        .get("limit")
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| "10".to_string());
    let mut query = vec![("limit", limit)];

    for key in PASSTHROUGH {
        if let Some(value) = params.get(key) {
            query.push((key, value.clone()));
        }
    }

    let status = StatusFilter::from_query(params.get("status").map(String::as_str).unwrap_or(""));
    if let Some(status) = status.as_query() {
        query.push(("status", status));
    }

    for key in FILTERS {
        if let Some(value) = params.get(key) {
            query.push((key, value.clone()));
        }
    }
    query
}

pub async fn list_submissions(
    _session: MaybeSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Checked<Page<Submission>>>, ApiError> {
    let bytes = state
        .docuseal
        .get("/submissions", &list_query(&params), state.config.api_key())
        .await?;
    Ok(Json(check_page(&bytes)?))
}

/// Create a submission. Needs a session or an API key, either configured on
/// the server or sent by the caller in `X-Auth-Token`.
pub async fn create_submission(
    session: MaybeSession,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let incoming_key = headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());
    let api_key = state
        .config
        .api_key
        .as_deref()
        .or(incoming_key)
        .unwrap_or_default()
        .to_string();

    if session.is_anonymous() && api_key.is_empty() {
        return Err(ApiError::Unauthorized(
            "Unauthorized - no session and no server API key configured",
        ));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        let payload = Payload::Raw {
            content_type: content_type.to_string(),
            bytes: body,
        };
        let bytes = state
            .docuseal
            .send(Method::POST, "/submissions", &[], &api_key, payload)
            .await?;
        info!("Forwarded multipart submission");
        return Ok((StatusCode::CREATED, Json(parse_json(&bytes)?)));
    }

    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid(format!("Invalid JSON body: {}", e)))?;
    let request: CreateSubmissionRequest = serde_json::from_value(value.clone())
        .map_err(|e| ApiError::invalid(format!("Invalid submission request: {}", e)))?;

    if let Err(e) = request.validate() {
        let received = match e {
            ValidationError::MissingTemplateId | ValidationError::NoSubmitters => {
                Some(value.clone())
            }
            ValidationError::SubmitterMissingEmail { .. } => None,
        };
        return Err(ApiError::InvalidRequest {
            message: e.to_string(),
            received,
        });
    }

    info!(
        "Creating submission from template {} for {} submitter(s)",
        request.template_id.unwrap_or_default(),
        request.submitters.len()
    );

    let created = state
        .docuseal
        .send_json(Method::POST, "/submissions", &api_key, value)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_submission(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Checked<Submission>>, ApiError> {
    let id = parse_id("submission", &id)?;
    let bytes = state
        .docuseal
        .get(&format!("/submissions/{}", id), &[], state.config.api_key())
        .await?;
    Ok(Json(check(&bytes)?))
}

pub async fn update_submission(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id("submission", &id)?;
    let body = json_body(body)?;
    let updated = state
        .docuseal
        .send_json(
            Method::PUT,
            &format!("/submissions/{}", id),
            state.config.api_key(),
            body,
        )
        .await?;
    info!("Updated submission {}", id);
    Ok(Json(updated))
}

pub async fn delete_submission(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id("submission", &id)?;
    state
        .docuseal
        .delete(&format!("/submissions/{}", id), state.config.api_key())
        .await?;
    info!("Archived submission {}", id);
    Ok(Json(json!({ "message": "Submission deleted successfully" })))
}

/// Signed documents of a submission
pub async fn submission_documents(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id("submission", &id)?;
    let bytes = state
        .docuseal
        .get(
            &format!("/submissions/{}/documents", id),
            &[],
            state.config.api_key(),
        )
        .await?;
    Ok(Json(parse_json(&bytes)?))
}
