//! Submissions: a template sent out to one or more submitters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::Resource;
use crate::submitter::Submitter;
use crate::template::Template;

/// Submission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Completed,
    Declined,
    Expired,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Completed => write!(f, "completed"),
            SubmissionStatus::Declined => write!(f, "declined"),
            SubmissionStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "completed" => Ok(SubmissionStatus::Completed),
            "declined" => Ok(SubmissionStatus::Declined),
            "expired" => Ok(SubmissionStatus::Expired),
            _ => Err(()),
        }
    }
}

/// Status filter for listing submissions, translated from the values the
/// submissions page sends (`ALL`, `SENT`, `OPENED`, `COMPLETED`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// No filter is sent upstream
    Any,
    Is(SubmissionStatus),
    /// Forwarded untouched, case included
    Raw(String),
}

impl StatusFilter {
    pub fn from_query(raw: &str) -> Self {
        match raw {
            "" | "ALL" => StatusFilter::Any,
            "SENT" => StatusFilter::Is(SubmissionStatus::Pending),
            // Upstream cannot filter on opened submissions
            "OPENED" => StatusFilter::Any,
            other => StatusFilter::Raw(other.to_string()),
        }
    }

    /// The `status` query value to send upstream, if any
    pub fn as_query(&self) -> Option<String> {
        match self {
            StatusFilter::Any => None,
            StatusFilter::Is(status) => Some(status.to_string()),
            StatusFilter::Raw(raw) => Some(raw.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEvent {
    pub id: u64,
    pub submitter_id: u64,
    pub event_type: String,
    pub event_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDocument {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedByUser {
    pub id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaItem {
    pub name: String,
    pub attachment_uuid: String,
}

/// Where a template field sits on a document page, in page fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldArea {
    pub page: u32,
    pub attachment_uuid: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    pub uuid: String,
    pub submitter_uuid: String,
    #[serde(default)]
    pub areas: Vec<FieldArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub source: String,
    pub submitters_order: String,
    pub slug: String,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_log_url: Option<String>,
    #[serde(default)]
    pub combined_document_url: Option<String>,
    #[serde(default)]
    pub expire_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub archived_at: Option<String>,
    #[serde(default)]
    pub submitters: Vec<Submitter>,
    pub template: Template,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<CreatedByUser>,
    #[serde(default)]
    pub submission_events: Vec<SubmissionEvent>,
    #[serde(default)]
    pub documents: Vec<SubmissionDocument>,
    #[serde(default)]
    pub schema: Vec<SchemaItem>,
    #[serde(default)]
    pub fields: Vec<SubmissionField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Submission {
    const KIND: &'static str = "submission";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_page, decode_value};
    use proptest::prelude::*;
    use serde_json::json;

    fn submission_json(status: &str) -> Value {
        json!({
            "id": 1,
            "name": null,
            "source": "api",
            "submitters_order": "random",
            "slug": "sub-1",
            "status": status,
            "combined_document_url": null,
            "expire_at": null,
            "completed_at": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "archived_at": null,
            "submitters": [],
            "template": {
                "id": 3,
                "name": "NDA",
                "external_id": null,
                "folder_name": "Default",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            },
            "fields": [{
                "name": "Signature",
                "type": "signature",
                "uuid": "f-1",
                "submitter_uuid": "s-1",
                "areas": [{ "page": 0, "attachment_uuid": "a-1", "x": 0.1, "y": 0.2, "w": 0.3, "h": 0.05 }]
            }]
        })
    }

    #[test]
    fn test_submission_decodes_nested_template_and_fields() {
        let submission: Submission = decode_value(submission_json("pending")).unwrap();
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.template.name, "NDA");
        assert_eq!(submission.fields[0].kind, "signature");
        assert_eq!(submission.fields[0].areas[0].w, 0.3);
    }

    #[test]
    fn test_unknown_submission_status_fails() {
        assert!(decode_value::<Submission>(submission_json("opened")).is_err());
    }

    #[test]
    fn test_paginated_submissions() {
        let page = decode_page::<Submission>(json!({
            "data": [submission_json("completed")],
            "pagination": { "count": 1, "next": null, "prev": null }
        }))
        .unwrap();
        assert_eq!(page.data[0].status, SubmissionStatus::Completed);
    }

    #[test]
    fn test_status_filter_mapping() {
        assert_eq!(StatusFilter::from_query("SENT").as_query(), Some("pending".into()));
        assert_eq!(StatusFilter::from_query("OPENED").as_query(), None);
        assert_eq!(StatusFilter::from_query("ALL").as_query(), None);
        assert_eq!(StatusFilter::from_query("").as_query(), None);
        assert_eq!(
            StatusFilter::from_query("COMPLETED"),
            StatusFilter::Raw("COMPLETED".into())
        );
        assert_eq!(StatusFilter::from_query("COMPLETED").as_query(), Some("COMPLETED".into()));
        assert_eq!(StatusFilter::from_query("declined").as_query(), Some("declined".into()));
        assert_eq!(
            StatusFilter::from_query("archived"),
            StatusFilter::Raw("archived".into())
        );
    }

    proptest! {
        /// Display and FromStr agree for every status
        #[test]
        fn status_display_parses_back(idx in 0usize..4) {
            let status = [
                SubmissionStatus::Pending,
                SubmissionStatus::Completed,
                SubmissionStatus::Declined,
                SubmissionStatus::Expired,
            ][idx];
            prop_assert_eq!(status.to_string().parse::<SubmissionStatus>(), Ok(status));
        }

        /// Anything that is not a known filter keyword reaches upstream unchanged
        #[test]
        fn unknown_filters_pass_through(raw in "[A-Za-z_]{3,12}") {
            prop_assume!(!matches!(raw.as_str(), "ALL" | "SENT" | "OPENED"));
            prop_assert_eq!(StatusFilter::from_query(&raw).as_query(), Some(raw.clone()));
        }
    }
}
