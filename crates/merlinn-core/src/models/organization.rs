//! Organization domain model.
//!
//! Organizations are the tenants of the records store. Integrations, users,
//! indexes and plan states all belong to exactly one organization.

use serde::{Deserialize, Serialize};

use super::common::RecordMeta;
use super::stored_model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Human-readable name.
    pub name: String,
}

stored_model!(Organization, Organization);
