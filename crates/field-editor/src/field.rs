//! Field model and id allocation

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry::FractionRect;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_WIDTH: f64 = 0.2;
const DEFAULT_HEIGHT: f64 = 0.12;

/// Field identifier. Saved templates may carry ids as strings or numbers;
/// both are read, and ids are always written as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => FieldId(s),
            RawId::Number(n) => FieldId(n.to_string()),
        })
    }
}

/// Hands out timestamp-based ids (milliseconds since the epoch).
///
/// Ids are strictly increasing per generator: two fields created in the same
/// millisecond, or after the clock steps back, still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct FieldIdGenerator {
    last: i64,
    /// Ids issued after `last` reached `i64::MAX`
    spill: u64,
}

impl FieldIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> FieldId {
        if self.last == i64::MAX {
            // A loaded id pinned the counter; keep ids distinct with a suffix
            self.spill += 1;
            return FieldId(format!("{}-{}", self.last, self.spill));
        }
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        FieldId(id.to_string())
    }

    /// Account for an id that already exists (e.g. loaded from a saved
    /// template) so it is never issued again
    pub fn observe(&mut self, id: &FieldId) {
        if let Ok(n) = id.as_str().parse::<i64>() {
            self.last = self.last.max(n);
        }
    }
}

/// What a field collects. The editor offers text, date and signature; any
/// other type string survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    #[default]
    Text,
    Date,
    Signature,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Signature => "signature",
            FieldKind::Other(s) => s,
        }
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => FieldKind::Text,
            "date" => FieldKind::Date,
            "signature" => FieldKind::Signature,
            _ => FieldKind::Other(s),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(s: &str) -> Self {
        FieldKind::from(s.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named rectangle on one page of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    /// 1-based page number
    #[serde(default = "default_page", deserialize_with = "page_or_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "or_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "or_zero")]
    pub y: f64,
    #[serde(default = "default_width", deserialize_with = "width_or_default")]
    pub w: f64,
    #[serde(default = "default_height", deserialize_with = "height_or_default")]
    pub h: f64,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

// An explicit `null` reads the same as a missing key

fn page_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or(DEFAULT_PAGE))
}

fn or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or(0.0))
}

fn width_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or(DEFAULT_WIDTH))
}

fn height_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or(DEFAULT_HEIGHT))
}

impl Field {
    /// New field at the top-left of `page` with the default size
    pub fn new(id: FieldId, name: impl Into<String>, kind: FieldKind, page: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            page,
            x: 0.0,
            y: 0.0,
            w: DEFAULT_WIDTH,
            h: DEFAULT_HEIGHT,
        }
    }

    pub fn rect(&self) -> FractionRect {
        FractionRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_rect(&mut self, rect: FractionRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }
}
