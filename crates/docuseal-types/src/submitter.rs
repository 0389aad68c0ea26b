//! Submitters: the individual signers of a submission

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::Resource;

/// Submitter status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitterStatus {
    Sent,
    Opened,
    Completed,
    Declined,
}

impl fmt::Display for SubmitterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitterStatus::Sent => write!(f, "sent"),
            SubmitterStatus::Opened => write!(f, "opened"),
            SubmitterStatus::Completed => write!(f, "completed"),
            SubmitterStatus::Declined => write!(f, "declined"),
        }
    }
}

/// A value the submitter filled into a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitterValue {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitterDocument {
    pub name: String,
    pub url: String,
}

/// Notification preferences for a submitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitterPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_sms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_redirect_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submitter {
    pub id: u64,
    pub submission_id: u64,
    pub uuid: String,
    pub email: String,
    pub slug: String,
    #[serde(default)]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub opened_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub declined_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    pub status: SubmitterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<SubmitterPreferences>,
    #[serde(default)]
    pub values: Vec<SubmitterValue>,
    #[serde(default)]
    pub documents: Vec<SubmitterDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_src: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Submitter {
    const KIND: &'static str = "submitter";
}

impl Submitter {
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            SubmitterStatus::Completed | SubmitterStatus::Declined
        )
    }
}
