//! Validation configuration.

use serde::Deserialize;

/// Handling of keys a record carries but its entity does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFields {
    /// Drop undeclared keys from the validated record.
    #[default]
    Ignore,
    /// Report each undeclared key as a field issue.
    Reject,
}

/// Configuration for the schema registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub unknown_fields: UnknownFields,
}

impl ValidationConfig {
    /// Configuration that rejects undeclared keys.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFields::Reject,
        }
    }
}
