//! Vendor domain model.
//!
//! A vendor is a third-party product (PagerDuty, Jira, Slack, ...) an
//! organization can connect to through an integration.

use serde::{Deserialize, Serialize};

use super::common::RecordMeta;
use super::stored_model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub description: String,
}

stored_model!(Vendor, Vendor);
