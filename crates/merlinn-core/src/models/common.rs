//! Building blocks shared by every record shape.
//!
//! Stored records carry a [`RecordMeta`] (identifier and timestamps) and may
//! point at each other through [`Ref`], which holds either the target's
//! [`ObjectId`] or a fully embedded copy of the target record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ObjectIdError;
use crate::models::Stored;

/// Unconstrained key/value mapping (`credentials`, `metadata`, `stats`, ...).
pub type Mapping = serde_json::Map<String, serde_json::Value>;

/// A record store identifier: 12 bytes rendered as 24 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub const LEN: usize = 24;

    /// Parses a 24-digit hex identifier. Uppercase digits are accepted and
    /// normalized to lowercase.
    pub fn parse(input: &str) -> Result<Self, ObjectIdError> {
        let len = input.chars().count();
        if len != Self::LEN {
            return Err(ObjectIdError::Length(len));
        }
        if let Some(bad) = input.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ObjectIdError::NonHex(bad));
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Identity shared by every stored record.
///
/// All parts are optional: a record being provisioned has no identifier yet,
/// and the store stamps the timestamps on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A relationship to another record: either its identifier or an embedded
/// copy of it. Readers must handle both forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Identifier(ObjectId),
    Embedded(Box<T>),
}

impl<T> Ref<T> {
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }

    pub fn as_embedded(&self) -> Option<&T> {
        match self {
            Self::Identifier(_) => None,
            Self::Embedded(record) => Some(record),
        }
    }
}

impl<T: Stored> Ref<T> {
    /// Identifier of the referenced record, whichever form is held.
    ///
    /// `None` only for an embedded record that was never assigned an `_id`.
    pub fn id(&self) -> Option<&ObjectId> {
        match self {
            Self::Identifier(id) => Some(id),
            Self::Embedded(record) => record.meta().id.as_ref(),
        }
    }
}

impl<T> From<ObjectId> for Ref<T> {
    fn from(id: ObjectId) -> Self {
        Self::Identifier(id)
    }
}
