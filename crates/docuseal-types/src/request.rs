//! Request bodies sent to DocuSeal and their local validation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("template_id is required")]
    MissingTemplateId,

    #[error("At least one submitter is required")]
    NoSubmitters,

    /// `position` is 1-based, as shown to the user
    #[error("Submitter {position} must have an email address")]
    SubmitterMissingEmail { position: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitterMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Per-field overrides when creating a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSubmitterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<SubmitterMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /submissions`.
///
/// Everything is optional on the way in so a malformed body reaches
/// [`CreateSubmissionRequest::validate`] and gets a readable message instead
/// of a serde error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSubmissionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_sms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<SubmitterMessage>,
    #[serde(default)]
    pub submitters: Vec<CreateSubmitterRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateSubmissionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.template_id {
            None | Some(0) => return Err(ValidationError::MissingTemplateId),
            Some(_) => {}
        }

        if self.submitters.is_empty() {
            return Err(ValidationError::NoSubmitters);
        }

        for (i, submitter) in self.submitters.iter().enumerate() {
            let has_email = submitter
                .email
                .as_deref()
                .is_some_and(|email| !email.trim().is_empty());
            if !has_email {
                return Err(ValidationError::SubmitterMissingEmail { position: i + 1 });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> CreateSubmissionRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let req = parse(json!({
            "template_id": 12,
            "send_email": true,
            "submitters": [{ "email": "a@example.com", "role": "First Party" }]
        }));
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn test_missing_template_id() {
        let req = parse(json!({ "submitters": [{ "email": "a@example.com" }] }));
        assert_eq!(req.validate(), Err(ValidationError::MissingTemplateId));
        assert_eq!(
            ValidationError::MissingTemplateId.to_string(),
            "template_id is required"
        );
    }

    #[test]
    fn test_empty_submitters() {
        let req = parse(json!({ "template_id": 1, "submitters": [] }));
        assert_eq!(req.validate(), Err(ValidationError::NoSubmitters));
    }

    #[test]
    fn test_second_submitter_without_email() {
        let req = parse(json!({
            "template_id": 1,
            "submitters": [{ "email": "a@example.com" }, { "name": "Bob" }]
        }));
        let err = req.validate().unwrap_err();
        assert_eq!(err, ValidationError::SubmitterMissingEmail { position: 2 });
        assert_eq!(err.to_string(), "Submitter 2 must have an email address");
    }

    #[test]
    fn test_unknown_keys_are_forwarded() {
        let body = json!({
            "template_id": 1,
            "bcc_completed": "audit@example.com",
            "submitters": [{ "email": "a@example.com", "require_phone_2fa": true }]
        });
        let req = parse(body.clone());
        assert_eq!(serde_json::to_value(&req).unwrap(), body);
    }
}
