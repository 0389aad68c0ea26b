//! Templates and the document upload payload

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::Resource;

/// A DocuSeal template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub folder_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub documents: Vec<TemplateDocument>,
    /// Free-form template preferences. The field editor stores its
    /// placements under `custom_fields`.
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Template {
    const KIND: &'static str = "template";
}

impl Template {
    /// Raw `preferences.custom_fields` entries, if any were saved
    pub fn custom_fields(&self) -> Option<&Value> {
        self.preferences.get("custom_fields")
    }
}

/// A document attached to a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which upstream endpoint converts an uploaded file into a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Docx,
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

impl UploadKind {
    /// DOCX when the browser says so or the filename ends in `.docx`,
    /// otherwise the file is treated as a PDF
    pub fn detect(mime: &str, filename: &str) -> Self {
        if mime == DOCX_MIME || filename.to_lowercase().ends_with(".docx") {
            UploadKind::Docx
        } else {
            UploadKind::Pdf
        }
    }

    pub fn upstream_path(&self) -> &'static str {
        match self {
            UploadKind::Pdf => "/templates/pdf",
            UploadKind::Docx => "/templates/docx",
        }
    }
}

/// Body for `POST /templates/pdf` and `POST /templates/docx`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub name: String,
    pub documents: Vec<UploadedDocument>,
}

/// One base64-encoded file inside a [`DocumentUpload`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub file: String,
}

impl DocumentUpload {
    /// Single-document upload; `file_base64` is the already encoded file body
    pub fn single(name: impl Into<String>, filename: impl Into<String>, file_base64: String) -> Self {
        Self {
            name: name.into(),
            documents: vec![UploadedDocument {
                name: filename.into(),
                file: file_base64,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": 42,
            "name": "Lease",
            "external_id": null,
            "folder_name": "Default",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "slug": "abc123",
            "documents": [{ "id": 1, "uuid": "d-1", "url": "https://example.com/a.pdf", "filename": "a.pdf", "preview_image_url": "p.png" }],
            "preferences": { "custom_fields": [{ "id": "1", "name": "Sign", "type": "signature" }] }
        })
    }

    #[test]
    fn test_template_round_trip_keeps_unknown_keys() {
        let template: Template = decode_value(sample()).unwrap();
        assert_eq!(template.id, 42);
        assert_eq!(template.extra.get("slug"), Some(&json!("abc123")));
        assert_eq!(
            template.documents[0].extra.get("preview_image_url"),
            Some(&json!("p.png"))
        );

        let encoded = serde_json::to_value(&template).unwrap();
        assert_eq!(encoded, sample());
    }

    #[test]
    fn test_custom_fields_lookup() {
        let template: Template = decode_value(sample()).unwrap();
        let fields = template.custom_fields().unwrap();
        assert_eq!(fields[0]["type"], json!("signature"));
    }

    #[test]
    fn test_missing_preferences_default_to_empty() {
        let template: Template = decode_value(json!({
            "id": 1,
            "name": "Bare",
            "created_at": "x",
            "updated_at": "y"
        }))
        .unwrap();
        assert!(template.custom_fields().is_none());
        assert!(template.documents.is_empty());
    }

    #[test]
    fn test_missing_name_is_a_decode_error() {
        let result = decode_value::<Template>(json!({ "id": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_kind_detection() {
        assert_eq!(UploadKind::detect(DOCX_MIME, "contract"), UploadKind::Docx);
        assert_eq!(UploadKind::detect("", "Contract.DOCX"), UploadKind::Docx);
        assert_eq!(UploadKind::detect("application/pdf", "a.pdf"), UploadKind::Pdf);
        assert_eq!(UploadKind::detect("", "document"), UploadKind::Pdf);
        assert_eq!(UploadKind::Docx.upstream_path(), "/templates/docx");
        assert_eq!(UploadKind::Pdf.upstream_path(), "/templates/pdf");
    }

    #[test]
    fn test_single_upload_shape() {
        let body = DocumentUpload::single("Uploaded Template", "a.pdf", "QUJD".to_string());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "name": "Uploaded Template", "documents": [{ "name": "a.pdf", "file": "QUJD" }] })
        );
    }
}
