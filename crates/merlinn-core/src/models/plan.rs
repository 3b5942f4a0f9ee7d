//! Plan domain model.

use serde::{Deserialize, Serialize};

use super::common::{Mapping, ObjectId, RecordMeta};
use super::stored_model;

/// A named bundle of quota fields assignable to an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    /// Identifiers of the plan's [`PlanField`](super::plan_field::PlanField)s.
    pub fields: Vec<ObjectId>,
    /// Limits per field code.
    pub values: Mapping,
}

stored_model!(Plan, Plan);
