//! Decoding upstream JSON into typed models

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

/// A DocuSeal resource with a human-readable kind used in error messages
pub trait Resource: DeserializeOwned {
    const KIND: &'static str;
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected {context} list, found {found}")]
    UnexpectedShape {
        context: &'static str,
        found: &'static str,
    },
}

/// Cursor pagination returned by list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub count: u64,
    #[serde(default)]
    pub next: Option<u64>,
    #[serde(default)]
    pub prev: Option<u64>,
}

/// A list response in the `{ data, pagination }` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Decode a single resource from raw bytes
pub fn decode<T: Resource>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError::Json {
        context: T::KIND,
        source,
    })
}

/// Decode a single resource from an already parsed value
pub fn decode_value<T: Resource>(value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Json {
        context: T::KIND,
        source,
    })
}

/// Decode a list response.
///
/// Some endpoints return a bare array and others the paginated envelope;
/// both come back as a [`Page`], bare arrays without pagination.
pub fn decode_page<T: Resource>(value: Value) -> Result<Page<T>, DecodeError> {
    let json_err = |source| DecodeError::Json {
        context: T::KIND,
        source,
    };

    match value {
        Value::Array(items) => {
            let data = items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(json_err))
                .collect::<Result<Vec<T>, _>>()?;
            Ok(Page {
                data,
                pagination: None,
            })
        }
        Value::Object(map) if map.contains_key("data") => {
            serde_json::from_value(Value::Object(map)).map_err(json_err)
        }
        other => Err(DecodeError::UnexpectedShape {
            context: T::KIND,
            found: kind_of(&other),
        }),
    }
}

/// [`decode_page`] straight from a response body
pub fn decode_page_bytes<T: Resource>(bytes: &[u8]) -> Result<Page<T>, DecodeError> {
    decode_page(parse::<T>(bytes)?)
}

/// A response that decoded into its typed model, kept alongside the JSON it
/// came from.
///
/// Serializes as the upstream JSON rather than as `T`: keys the upstream
/// left out stay out and empty collections stay in.
#[derive(Debug, Clone, PartialEq)]
pub struct Checked<T> {
    pub typed: T,
    raw: Value,
}

impl<T> Checked<T> {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl<T> Serialize for Checked<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Decode a single resource, keeping the body as received
pub fn check<T: Resource>(bytes: &[u8]) -> Result<Checked<T>, DecodeError> {
    let raw = parse::<T>(bytes)?;
    let typed = T::deserialize(&raw).map_err(|source| DecodeError::Json {
        context: T::KIND,
        source,
    })?;
    Ok(Checked { typed, raw })
}

/// Decode a list response, keeping the body as received. A bare array is
/// relayed inside a `{ data }` envelope.
pub fn check_page<T: Resource>(bytes: &[u8]) -> Result<Checked<Page<T>>, DecodeError> {
    let raw = parse::<T>(bytes)?;
    let typed = decode_page(raw.clone())?;
    let raw = match raw {
        Value::Array(items) => json!({ "data": items }),
        other => other,
    };
    Ok(Checked { typed, raw })
}

fn parse<T: Resource>(bytes: &[u8]) -> Result<Value, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError::Json {
        context: T::KIND,
        source,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object without data",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    impl Resource for Item {
        const KIND: &'static str = "item";
    }

    #[test]
    fn test_bare_array_becomes_page_without_pagination() {
        let page: Page<Item> = decode_page(json!([{ "id": 1 }, { "id": 2 }])).unwrap();
        assert_eq!(page.data, vec![Item { id: 1 }, Item { id: 2 }]);
        assert!(page.pagination.is_none());
    }

    #[test]
    fn test_envelope_keeps_pagination() {
        let page: Page<Item> = decode_page(json!({
            "data": [{ "id": 7 }],
            "pagination": { "count": 1, "next": 7, "prev": null }
        }))
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(
            page.pagination,
            Some(Pagination {
                count: 1,
                next: Some(7),
                prev: None
            })
        );
    }

    #[test]
    fn test_unexpected_shape_names_what_was_found() {
        let err = decode_page::<Item>(json!({ "error": "nope" })).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedShape {
                context: "item",
                found: "object without data"
            }
        ));

        let err = decode_page::<Item>(json!("text")).unwrap_err();
        assert_eq!(err.to_string(), "expected item list, found string");
    }

    #[test]
    fn test_bad_item_reports_json_error() {
        let err = decode_page::<Item>(json!([{ "id": "one" }])).unwrap_err();
        assert!(matches!(err, DecodeError::Json { context: "item", .. }));
    }

    #[test]
    fn test_page_without_pagination_serializes_as_data_only() {
        let page = Page {
            data: vec![1, 2],
            pagination: None,
        };
        assert_eq!(serde_json::to_value(&page).unwrap(), json!({ "data": [1, 2] }));
    }

    #[test]
    fn test_page_from_bytes() {
        let page: Page<Item> = decode_page_bytes(br#"[{"id": 3}]"#).unwrap();
        assert_eq!(page.data, vec![Item { id: 3 }]);

        let err = decode_page_bytes::<Item>(b"<html>").unwrap_err();
        assert!(matches!(err, DecodeError::Json { context: "item", .. }));
    }

    #[test]
    fn test_checked_relays_the_body_as_received() {
        let body = br#"{"id": 9, "tags": [], "note": null}"#;
        let checked: Checked<Item> = check(body).unwrap();
        assert_eq!(checked.typed, Item { id: 9 });
        assert_eq!(
            serde_json::to_value(&checked).unwrap(),
            json!({ "id": 9, "tags": [], "note": null })
        );

        assert!(matches!(
            check::<Item>(br#"{"id": "nine"}"#),
            Err(DecodeError::Json { context: "item", .. })
        ));
    }

    #[test]
    fn test_checked_page_wraps_bare_arrays() {
        let checked: Checked<Page<Item>> = check_page(br#"[{"id": 1, "extra": {}}]"#).unwrap();
        assert_eq!(checked.typed.data, vec![Item { id: 1 }]);
        assert_eq!(
            checked.into_raw(),
            json!({ "data": [{ "id": 1, "extra": {} }] })
        );

        let envelope = br#"{"data": [], "pagination": {"count": 0, "next": null, "prev": null}}"#;
        let checked: Checked<Page<Item>> = check_page(envelope).unwrap();
        assert_eq!(
            checked.raw(),
            &json!({ "data": [], "pagination": { "count": 0, "next": null, "prev": null } })
        );
    }
}
