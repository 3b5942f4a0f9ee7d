//! User domain model.

use serde::{Deserialize, Serialize};

use super::common::{RecordMeta, Ref};
use super::organization::Organization;
use super::stored_model;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Activated,
    Invited,
}

impl UserStatus {
    pub const VALUES: &'static [&'static str] = &["activated", "invited"];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Member,
}

impl UserRole {
    pub const VALUES: &'static [&'static str] = &["owner", "member"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Subject identifier issued by the identity provider (e.g. `auth0|123`).
    #[serde(rename = "auth0Id")]
    pub auth0_id: String,
    pub email: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub organization: Ref<Organization>,
}

stored_model!(User, User);
