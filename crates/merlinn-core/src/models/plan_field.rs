//! Plan field domain model.
//!
//! A plan field is one quota dimension (e.g. indexing attempts per month).
//! `kind` says what sort of value the field tracks and `initial_value` is the
//! counter's starting point. The two are expected to agree, but no mapping
//! between kinds and value types is defined here, so nothing enforces it;
//! [`InitialValue::type_name`] lets callers make that comparison themselves.

use serde::{Deserialize, Serialize};

use super::common::RecordMeta;
use super::stored_model;

/// Reset mode applied when a record does not specify one.
pub const DEFAULT_RESET_MODE: &str = "manual";

fn default_reset_mode() -> String {
    DEFAULT_RESET_MODE.to_owned()
}

/// Starting value of a plan field counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl InitialValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "text",
        }
    }
}

impl From<i64> for InitialValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for InitialValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for InitialValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanField {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    /// Stable machine name, e.g. `indexingAttempts`.
    pub code: String,
    pub kind: String,
    pub initial_value: InitialValue,
    /// Reset period unit (e.g. `month`).
    pub granularity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_exceed_limit: Option<bool>,
    #[serde(default = "default_reset_mode")]
    pub reset_mode: String,
}

stored_model!(PlanField, PlanField);
