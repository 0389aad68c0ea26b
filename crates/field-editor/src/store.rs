//! Loading and saving a template's fields through the proxy

use docuseal_types::{decode, DecodeError, Template};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::field::Field;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid custom_fields: {0}")]
    Fields(#[source] serde_json::Error),
}

/// Where a template's field placements live
#[allow(async_fn_in_trait)]
pub trait TemplateStore {
    async fn load_fields(&self, template_id: u64) -> Result<Vec<Field>, StoreError>;

    /// Replace the template's saved fields with `fields`
    async fn save_fields(&self, template_id: u64, fields: &[Field]) -> Result<(), StoreError>;
}

/// [`TemplateStore`] backed by the proxy's `/api/docuseal/templates/{id}`
#[derive(Debug, Clone)]
pub struct HttpTemplateStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn template_url(&self, template_id: u64) -> String {
        format!("{}/api/docuseal/templates/{}", self.base_url, template_id)
    }
}

impl TemplateStore for HttpTemplateStore {
    async fn load_fields(&self, template_id: u64) -> Result<Vec<Field>, StoreError> {
        let url = self.template_url(template_id);
        debug!("Loading fields from {}", url);

        let response = ensure_success(self.client.get(&url).send().await?).await?;
        let bytes = response.bytes().await?;
        let template: Template = decode(&bytes)?;
        fields_from_template(&template)
    }

    async fn save_fields(&self, template_id: u64, fields: &[Field]) -> Result<(), StoreError> {
        let url = self.template_url(template_id);
        let payload = custom_fields_payload(fields);

        let response = self.client.put(&url).json(&payload).send().await?;
        ensure_success(response).await?;

        info!("Saved {} fields to template {}", fields.len(), template_id);
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Fields saved on a template. Nothing saved yet is an empty list.
pub fn fields_from_template(template: &Template) -> Result<Vec<Field>, StoreError> {
    match template.custom_fields() {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(StoreError::Fields),
    }
}

/// Template update body carrying the whole field list
pub fn custom_fields_payload(fields: &[Field]) -> Value {
    json!({ "preferences": { "custom_fields": fields } })
}
