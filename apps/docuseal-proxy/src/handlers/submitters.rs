//! `/api/docuseal/submitters` routes

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::Method,
    Json,
};
use docuseal_types::{check, check_page, Checked, Page, Submitter};
use serde_json::Value;
use tracing::info;

use super::{json_body, non_empty, parse_id};
use crate::auth::{MaybeSession, RequireSession};
use crate::error::ApiError;
use crate::AppState;

/// Optional filters, forwarded only when non-empty
const FILTERS: [&str; 8] = [
    "after",
    "before",
    "submission_id",
    "q",
    "slug",
    "completed_after",
    "completed_before",
    "external_id",
];

pub fn list_query(params: &HashMap<String, String>) -> Vec<(&'static str, String)> {
    let limit = non_empty(params.get("limit")).unwrap_or("10").to_string();
    let mut query = vec![("limit", limit)];
    for key in FILTERS {
        if let Some(value) = non_empty(params.get(key)) {
            query.push((key, value.to_string()));
        }
    }
    query
}

pub async fn list_submitters(
    _session: MaybeSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Checked<Page<Submitter>>>, ApiError> {
    let bytes = state
        .docuseal
        .get("/submitters", &list_query(&params), state.config.api_key())
        .await?;
    Ok(Json(check_page(&bytes)?))
}

pub async fn get_submitter(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Checked<Submitter>>, ApiError> {
    let id = parse_id("submitter", &id)?;
    let bytes = state
        .docuseal
        .get(&format!("/submitters/{}", id), &[], state.config.api_key())
        .await?;
    Ok(Json(check(&bytes)?))
}

pub async fn update_submitter(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id("submitter", &id)?;
    let body = json_body(body)?;
    let updated = state
        .docuseal
        .send_json(
            Method::PUT,
            &format!("/submitters/{}", id),
            state.config.api_key(),
            body,
        )
        .await?;
    info!("Updated submitter {}", id);
    Ok(Json(updated))
}
