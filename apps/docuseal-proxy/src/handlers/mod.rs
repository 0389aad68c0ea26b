//! HTTP handlers for the DocuSeal proxy

pub mod builder_token;
pub mod submissions;
pub mod submitters;
pub mod templates;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// DocuSeal ids are integers; anything else never leaves the proxy
fn parse_id(kind: &str, raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid(format!("Invalid {} id: {}", kind, raw)))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::invalid(e.body_text()))
}

/// Query value unless it is missing or empty
fn non_empty<'a>(value: Option<&'a String>) -> Option<&'a str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("template", "42").unwrap(), 42);
        assert!(matches!(
            parse_id("template", "../admin"),
            Err(ApiError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_non_empty() {
        let empty = String::new();
        let value = "5".to_string();
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(&empty)), None);
        assert_eq!(non_empty(Some(&value)), Some("5"));
    }
}
