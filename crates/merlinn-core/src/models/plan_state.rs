//! Plan state domain model.

use serde::{Deserialize, Serialize};

use super::common::{Mapping, RecordMeta, Ref};
use super::organization::Organization;
use super::plan::Plan;
use super::stored_model;

/// Live usage counters of one organization under one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanState {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub plan: Ref<Plan>,
    pub organization: Ref<Organization>,
    pub state: Mapping,
}

stored_model!(PlanState, PlanState);
