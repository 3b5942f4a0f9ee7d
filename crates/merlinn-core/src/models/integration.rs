//! Integration domain model.

use serde::{Deserialize, Serialize};

use super::common::{Mapping, RecordMeta, Ref};
use super::organization::Organization;
use super::stored_model;
use super::vendor::Vendor;

/// A configured connection between an organization and a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub vendor: Ref<Vendor>,
    pub organization: Ref<Organization>,
    /// Secret material (or references to it). Absent for vendors that need none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Mapping>,
    /// Vendor-specific settings; always present, possibly empty.
    pub metadata: Mapping,
}

stored_model!(Integration, Integration);
