//! Index domain model.
//!
//! An index is the synchronized view an organization builds over a set of
//! data sources. Its progress lives in the embedded [`IndexState`].

use serde::{Deserialize, Serialize};

use super::common::{Mapping, RecordMeta, Ref};
use super::organization::Organization;
use super::{Model, stored_model};
use crate::schema::Entity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    Pending,
    Completed,
    Failed,
}

impl IndexStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "completed", "failed"];
}

/// Embedded progress of an index; never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexState {
    pub status: IndexStatus,
    /// Per-integration progress, keyed by integration name.
    pub integrations: Mapping,
}

impl Model for IndexState {
    const ENTITY: Entity = Entity::IndexState;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub organization: Ref<Organization>,
    /// Names of the integrations being indexed, in request order.
    pub data_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Mapping>,
    pub state: IndexState,
}

stored_model!(Index, Index);
