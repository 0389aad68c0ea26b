//! `/api/docuseal/templates` routes

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, FromRequest, Multipart, Path,
        Query, Request, State,
    },
    http::{header, Method, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use docuseal_types::{
    check, check_page, Checked, DocumentUpload, Page, Template, UploadKind,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{json_body, non_empty, parse_id};
use crate::auth::{MaybeSession, RequireSession};
use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_TEMPLATE_NAME: &str = "Uploaded Template";

#[derive(Debug, Default, Deserialize)]
pub struct ListTemplatesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_templates(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<Checked<Page<Template>>>, ApiError> {
    let page = non_empty(query.page.as_ref()).unwrap_or("1");
    let per_page = non_empty(query.limit.as_ref()).unwrap_or("10");

    let bytes = state
        .docuseal
        .get(
            "/templates",
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
            state.config.api_key(),
        )
        .await?;
    Ok(Json(check_page(&bytes)?))
}

/// JSON bodies go to `POST /templates`; multipart bodies are file uploads
pub async fn create_template(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::invalid(e.to_string()))?;
        return upload(&state, multipart).await;
    }

    let body = json_body(Json::<Value>::from_request(request, &state).await)?;
    let created = state
        .docuseal
        .send_json(Method::POST, "/templates", state.config.api_key(), body)
        .await?;
    info!("Created template");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Upload a PDF or DOCX and let DocuSeal build a template from it. Allowed
/// without a session when the server holds an API key.
pub async fn upload_template(
    session: MaybeSession,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if session.is_anonymous() && !state.config.has_api_key() {
        return Err(ApiError::unauthorized());
    }
    let multipart = multipart.map_err(|e| ApiError::invalid(e.to_string()))?;
    upload(&state, multipart).await
}

struct UploadedFile {
    filename: Option<String>,
    mime: Option<String>,
    bytes: Bytes,
}

async fn upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut file = None;
    let mut name = None;
    let mut template_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let mime = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid(e.to_string()))?;
                file = Some(UploadedFile {
                    filename,
                    mime,
                    bytes,
                });
            }
            "name" => name = Some(field.text().await.map_err(|e| ApiError::invalid(e.to_string()))?),
            "template_name" => {
                template_name =
                    Some(field.text().await.map_err(|e| ApiError::invalid(e.to_string()))?)
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::invalid("File is required"))?;
    let name = [name, template_name]
        .into_iter()
        .flatten()
        .find(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE_NAME.to_string());
    let filename = file
        .filename
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| "document".to_string());
    let kind = UploadKind::detect(file.mime.as_deref().unwrap_or_default(), &filename);

    info!(
        "Uploading {} ({} bytes) to {}",
        filename,
        file.bytes.len(),
        kind.upstream_path()
    );

    let payload = DocumentUpload::single(name, filename, BASE64.encode(&file.bytes));
    let body = serde_json::to_value(&payload).map_err(|e| ApiError::Internal(e.to_string()))?;
    let created = state
        .docuseal
        .send_json(Method::POST, kind.upstream_path(), state.config.api_key(), body)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_template(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Checked<Template>>, ApiError> {
    let id = parse_id("template", &id)?;
    let bytes = state
        .docuseal
        .get(&format!("/templates/{}", id), &[], state.config.api_key())
        .await?;
    Ok(Json(check(&bytes)?))
}

pub async fn update_template(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id("template", &id)?;
    let body = json_body(body)?;
    let updated = state
        .docuseal
        .send_json(
            Method::PUT,
            &format!("/templates/{}", id),
            state.config.api_key(),
            body,
        )
        .await?;
    info!("Updated template {}", id);
    Ok(Json(updated))
}

pub async fn delete_template(
    _session: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id("template", &id)?;
    state
        .docuseal
        .delete(&format!("/templates/{}", id), state.config.api_key())
        .await?;
    info!("Deleted template {}", id);
    Ok(Json(json!({ "message": "Template deleted successfully" })))
}
