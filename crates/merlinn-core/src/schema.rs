//! Field-level declarations for every record shape.
//!
//! An [`EntitySchema`] lists the wire name, type, optionality and default of
//! each field. The declarations drive both record validation
//! ([`SchemaRegistry`](crate::registry::SchemaRegistry)) and the store-side
//! schema, so they are the single source of truth for the record contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MerlinnError;
use crate::models::index::IndexStatus;
use crate::models::plan_field::DEFAULT_RESET_MODE;
use crate::models::user::{UserRole, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Entity {
    Vendor,
    Organization,
    Integration,
    User,
    IndexState,
    Index,
    Plan,
    PlanField,
    PlanState,
}

impl Entity {
    pub const ALL: [Self; 9] = [
        Self::Vendor,
        Self::Organization,
        Self::Integration,
        Self::User,
        Self::IndexState,
        Self::Index,
        Self::Plan,
        Self::PlanField,
        Self::PlanState,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Vendor => "Vendor",
            Self::Organization => "Organization",
            Self::Integration => "Integration",
            Self::User => "User",
            Self::IndexState => "IndexState",
            Self::Index => "Index",
            Self::Plan => "Plan",
            Self::PlanField => "PlanField",
            Self::PlanState => "PlanState",
        }
    }

    /// Store table holding records of this entity. `None` for shapes that
    /// only exist embedded in another record.
    pub const fn table(self) -> Option<&'static str> {
        match self {
            Self::Vendor => Some("vendor"),
            Self::Organization => Some("organization"),
            Self::Integration => Some("integration"),
            Self::User => Some("user"),
            Self::IndexState => None,
            Self::Index => Some("db_index"),
            Self::Plan => Some("plan"),
            Self::PlanField => Some("plan_field"),
            Self::PlanState => Some("plan_state"),
        }
    }

    /// Whether records carry the shared identity (`_id`, timestamps).
    pub const fn is_stored(self) -> bool {
        self.table().is_some()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = MerlinnError;

    /// Accepts `PlanField`, `planField`, `plan_field` and `plan-field` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|entity| entity.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| MerlinnError::UnknownEntity { name: s.to_owned() })
    }
}

/// Type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Boolean,
    /// RFC 3339 timestamp.
    Timestamp,
    ObjectId,
    /// JSON object with unconstrained keys and values.
    Mapping,
    TextList,
    ObjectIdList,
    /// Integer, boolean or text.
    Scalar,
    /// Text restricted to a fixed set of values.
    OneOf(&'static [&'static str]),
    /// Identifier of, or embedded copy of, another stored record.
    Reference(Entity),
    /// Nested record that only exists inside its parent.
    Embedded(Entity),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Boolean => f.write_str("boolean"),
            Self::Timestamp => f.write_str("RFC 3339 timestamp"),
            Self::ObjectId => f.write_str("object id"),
            Self::Mapping => f.write_str("mapping"),
            Self::TextList => f.write_str("list of text"),
            Self::ObjectIdList => f.write_str("list of object ids"),
            Self::Scalar => f.write_str("integer, boolean or text"),
            Self::OneOf(allowed) => write!(f, "one of [{}]", allowed.join(", ")),
            Self::Reference(entity) => write!(f, "{entity} id or embedded {entity}"),
            Self::Embedded(entity) => write!(f, "embedded {entity}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name.
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    /// Text value materialized when the field is absent or `null`.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
            default: None,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

/// Ordered field declarations of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub entity: Entity,
    pub fields: Vec<FieldSpec>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

const BASE_FIELDS: [FieldSpec; 3] = [
    FieldSpec::optional("_id", FieldType::ObjectId),
    FieldSpec::optional("createdAt", FieldType::Timestamp),
    FieldSpec::optional("updatedAt", FieldType::Timestamp),
];

/// Builds the declaration of `entity`.
pub fn declare(entity: Entity) -> EntitySchema {
    use FieldType::*;

    let own = match entity {
        Entity::Vendor => vec![
            FieldSpec::required("name", Text),
            FieldSpec::required("description", Text),
        ],
        Entity::Organization => vec![FieldSpec::required("name", Text)],
        Entity::Integration => vec![
            FieldSpec::required("vendor", Reference(Entity::Vendor)),
            FieldSpec::required("organization", Reference(Entity::Organization)),
            FieldSpec::optional("credentials", Mapping),
            FieldSpec::required("metadata", Mapping),
        ],
        Entity::User => vec![
            FieldSpec::required("auth0Id", Text),
            FieldSpec::required("email", Text),
            FieldSpec::required("status", OneOf(UserStatus::VALUES)),
            FieldSpec::required("role", OneOf(UserRole::VALUES)),
            FieldSpec::required("organization", Reference(Entity::Organization)),
        ],
        Entity::IndexState => vec![
            FieldSpec::required("status", OneOf(IndexStatus::VALUES)),
            FieldSpec::required("integrations", Mapping),
        ],
        Entity::Index => vec![
            FieldSpec::required("organization", Reference(Entity::Organization)),
            FieldSpec::required("dataSources", TextList),
            FieldSpec::optional("stats", Mapping),
            FieldSpec::required("state", Embedded(Entity::IndexState)),
        ],
        Entity::Plan => vec![
            FieldSpec::required("name", Text),
            FieldSpec::required("fields", ObjectIdList),
            FieldSpec::required("values", Mapping),
        ],
        Entity::PlanField => vec![
            FieldSpec::required("name", Text),
            FieldSpec::required("code", Text),
            FieldSpec::required("kind", Text),
            FieldSpec::required("initialValue", Scalar),
            FieldSpec::required("granularity", Text),
            FieldSpec::optional("canExceedLimit", Boolean),
            FieldSpec::optional("resetMode", Text).with_default(DEFAULT_RESET_MODE),
        ],
        Entity::PlanState => vec![
            FieldSpec::required("plan", Reference(Entity::Plan)),
            FieldSpec::required("organization", Reference(Entity::Organization)),
            FieldSpec::required("state", Mapping),
        ],
    };

    let mut fields = Vec::with_capacity(BASE_FIELDS.len() + own.len());
    if entity.is_stored() {
        fields.extend(BASE_FIELDS);
    }
    fields.extend(own);

    EntitySchema { entity, fields }
}
