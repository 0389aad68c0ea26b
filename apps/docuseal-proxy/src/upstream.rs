//! HTTP client for the DocuSeal REST API

use axum::body::Bytes;
use axum::http::{header, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Outgoing request body
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Value),
    /// Forwarded untouched with its original content type
    Raw { content_type: String, bytes: Bytes },
}

#[derive(Debug, Clone)]
pub struct DocusealClient {
    http: reqwest::Client,
    base_url: String,
}

impl DocusealClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and return the success body. A non-success answer
    /// becomes [`ApiError::Upstream`] carrying the status and body as-is.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        api_key: &str,
        payload: Payload,
    ) -> Result<Bytes, ApiError> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTH_HEADER, api_key);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Raw {
                content_type,
                bytes,
            } => request.header(header::CONTENT_TYPE, content_type).body(bytes),
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status,
                body: error_body(&bytes),
            });
        }
        Ok(bytes)
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        api_key: &str,
    ) -> Result<Bytes, ApiError> {
        self.send(Method::GET, path, query, api_key, Payload::Empty)
            .await
    }

    /// Send a JSON body and parse the JSON answer
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        api_key: &str,
        body: Value,
    ) -> Result<Value, ApiError> {
        let bytes = self
            .send(method, path, &[], api_key, Payload::Json(body))
            .await?;
        parse_json(&bytes)
    }

    pub async fn delete(&self, path: &str, api_key: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], api_key, Payload::Empty)
            .await
            .map(|_| ())
    }
}

/// Parse a success body that is relayed without a typed model
pub fn parse_json(bytes: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Internal(format!("invalid JSON from DocuSeal: {}", e)))
}

/// Error bodies are relayed as JSON when they parse, otherwise as a JSON
/// string holding the raw text
pub fn error_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_json_or_text() {
        assert_eq!(error_body(br#"{"error":"nope"}"#), json!({ "error": "nope" }));
        assert_eq!(error_body(b"Bad Gateway"), json!("Bad Gateway"));
        assert_eq!(error_body(b""), json!(""));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = DocusealClient::new("http://localhost:9000/");
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.url("/templates/1"), "http://localhost:9000/templates/1");
    }

    #[test]
    fn test_parse_json_failure_is_internal() {
        assert!(matches!(parse_json(b"<html>"), Err(ApiError::Internal(_))));
    }
}
