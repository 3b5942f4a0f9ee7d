//! Schema registry: validates untyped records against entity declarations.
//!
//! Validation walks the declaration of the target entity and checks every
//! field, collecting all issues before giving up. While walking, it builds a
//! normalized copy of the record (declared fields only, optional `null`s
//! dropped, defaults filled in, identifiers lowercased) which is then turned
//! into the typed model. Validation never touches shared state, so a single
//! registry can be used from any number of threads.

use chrono::{DateTime, Datelike, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{UnknownFields, ValidationConfig};
use crate::error::{FieldIssue, IssueKind, MerlinnResult, ValidationError};
use crate::models::Model;
use crate::models::common::ObjectId;
use crate::models::index::{Index, IndexState};
use crate::models::integration::Integration;
use crate::models::organization::Organization;
use crate::models::plan::Plan;
use crate::models::plan_field::PlanField;
use crate::models::plan_state::PlanState;
use crate::models::user::User;
use crate::models::vendor::Vendor;
use crate::schema::{Entity, EntitySchema, FieldSpec, FieldType, declare};

/// Path used for issues concerning the record as a whole.
const ROOT_PATH: &str = "$";

/// Fixed set of entity declarations plus the validation policy.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    config: ValidationConfig,
    schemas: [EntitySchema; Entity::ALL.len()],
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

macro_rules! records {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// A validated record of any entity.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Record {
            $($variant($ty)),+
        }

        impl Record {
            pub fn entity(&self) -> Entity {
                match self {
                    $(Self::$variant(_) => Entity::$variant),+
                }
            }

            /// Renders the record back to its wire form.
            pub fn to_value(&self) -> MerlinnResult<Value> {
                let value = match self {
                    $(Self::$variant(record) => serde_json::to_value(record)?),+
                };
                Ok(value)
            }
        }

        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Self::$variant(record)
                }
            }
        )+

        impl SchemaRegistry {
            /// Validates `value` as a record of `entity`.
            ///
            /// # Errors
            /// Returns a [`ValidationError`] listing every offending field.
            pub fn validate(&self, entity: Entity, value: &Value) -> Result<Record, ValidationError> {
                match entity {
                    $(Entity::$variant => self.validate_as::<$ty>(value).map(Record::$variant)),+
                }
            }
        }
    };
}

records! {
    Vendor(Vendor),
    Organization(Organization),
    Integration(Integration),
    User(User),
    IndexState(IndexState),
    Index(Index),
    Plan(Plan),
    PlanField(PlanField),
    PlanState(PlanState),
}

impl SchemaRegistry {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            schemas: Entity::ALL.map(declare),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn schema(&self, entity: Entity) -> &EntitySchema {
        &self.schemas[entity as usize]
    }

    pub fn schemas(&self) -> impl Iterator<Item = &EntitySchema> {
        self.schemas.iter()
    }

    /// Lists every issue of `value` as a record of `entity`; empty when valid.
    pub fn check(&self, entity: Entity, value: &Value) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        self.normalize(entity, value, &mut issues);
        issues
    }

    /// Validates `value` as a `T`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate_as<T: Model>(&self, value: &Value) -> Result<T, ValidationError> {
        let entity = T::ENTITY;
        let mut issues = Vec::new();
        let normalized = self.normalize(entity, value, &mut issues);

        if !issues.is_empty() {
            warn!(entity = %entity, issues = issues.len(), "Record rejected");
            return Err(ValidationError { entity, issues });
        }

        let record = serde_json::from_value(normalized).map_err(|e| ValidationError {
            entity,
            issues: vec![FieldIssue::new(
                ROOT_PATH,
                IssueKind::Malformed {
                    message: e.to_string(),
                },
            )],
        })?;

        debug!(entity = %entity, "Record validated");
        Ok(record)
    }

    /// Parses `json` and validates it as a record of `entity`.
    ///
    /// # Errors
    /// [`MerlinnError::Json`](crate::error::MerlinnError::Json) for malformed
    /// text, [`MerlinnError::Validation`](crate::error::MerlinnError::Validation)
    /// for a non-conforming record.
    pub fn validate_str(&self, entity: Entity, json: &str) -> MerlinnResult<Record> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.validate(entity, &value)?)
    }

    fn normalize(&self, entity: Entity, value: &Value, issues: &mut Vec<FieldIssue>) -> Value {
        match value {
            Value::Object(record) => Value::Object(self.check_record(entity, record, "", issues)),
            _ => {
                issues.push(FieldIssue::new(
                    ROOT_PATH,
                    IssueKind::WrongType {
                        expected: format!("{entity} record"),
                    },
                ));
                Value::Null
            }
        }
    }

    fn check_record(
        &self,
        entity: Entity,
        record: &Map<String, Value>,
        prefix: &str,
        issues: &mut Vec<FieldIssue>,
    ) -> Map<String, Value> {
        let schema = self.schema(entity);
        let mut normalized = Map::new();

        for spec in &schema.fields {
            let path = join(prefix, spec.name);
            if let Some(value) = self.check_field(spec, record.get(spec.name), &path, issues) {
                normalized.insert(spec.name.to_owned(), value);
            }
        }

        if self.config.unknown_fields == UnknownFields::Reject {
            for key in record.keys().filter(|key| !schema.declares(key)) {
                issues.push(FieldIssue::new(join(prefix, key), IssueKind::UnknownField));
            }
        }

        normalized
    }

    fn check_field(
        &self,
        spec: &FieldSpec,
        value: Option<&Value>,
        path: &str,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        match value {
            None | Some(Value::Null) => {
                if spec.required {
                    issues.push(FieldIssue::new(path, IssueKind::Missing));
                }
                spec.default.map(|default| Value::String(default.to_owned()))
            }
            Some(value) => self.check_value(spec.ty, value, path, issues),
        }
    }

    fn check_value(
        &self,
        ty: FieldType,
        value: &Value,
        path: &str,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        let accepted = match ty {
            FieldType::Text => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Mapping => value.is_object(),
            FieldType::Scalar => value.is_i64() || value.is_boolean() || value.is_string(),
            FieldType::Timestamp => value.as_str().is_some_and(is_storable_timestamp),
            FieldType::ObjectId => {
                return match value.as_str().map(ObjectId::parse) {
                    Some(Ok(id)) => Some(Value::String(id.to_string())),
                    _ => {
                        issues.push(wrong_type(ty, path));
                        None
                    }
                };
            }
            FieldType::OneOf(allowed) => {
                if value
                    .as_str()
                    .is_some_and(|raw| allowed.iter().any(|option| *option == raw))
                {
                    return Some(value.clone());
                }
                issues.push(FieldIssue::new(
                    path,
                    IssueKind::NotInSet {
                        found: value.to_string(),
                        allowed,
                    },
                ));
                return None;
            }
            FieldType::TextList => return check_text_list(value, path, issues),
            FieldType::ObjectIdList => return check_identifier_list(value, path, issues),
            FieldType::Reference(target) => {
                return self.check_reference(target, value, path, issues);
            }
            FieldType::Embedded(target) => {
                return match value {
                    Value::Object(record) => {
                        Some(Value::Object(self.check_record(target, record, path, issues)))
                    }
                    _ => {
                        issues.push(wrong_type(ty, path));
                        None
                    }
                };
            }
        };

        if accepted {
            Some(value.clone())
        } else {
            issues.push(wrong_type(ty, path));
            None
        }
    }

    fn check_reference(
        &self,
        target: Entity,
        value: &Value,
        path: &str,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        match value {
            Value::String(_) => check_identifier(value, path, issues),
            Value::Object(record) => {
                Some(Value::Object(self.check_record(target, record, path, issues)))
            }
            _ => {
                issues.push(FieldIssue::new(
                    path,
                    IssueKind::InvalidReference {
                        reason: format!("expected {target} id or embedded {target}, found {value}"),
                    },
                ));
                None
            }
        }
    }
}

fn check_identifier(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<Value> {
    let reason = match value.as_str().map(ObjectId::parse) {
        Some(Ok(id)) => return Some(Value::String(id.to_string())),
        Some(Err(e)) => e.to_string(),
        None => format!("expected object id, found {value}"),
    };
    issues.push(FieldIssue::new(path, IssueKind::InvalidReference { reason }));
    None
}

/// RFC 3339 only has four-digit years, so the instant must still have one
/// once it is shifted to UTC.
fn is_storable_timestamp(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw)
        .is_ok_and(|at| (0..=9999).contains(&at.with_timezone(&Utc).year()))
}

fn check_text_list(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<Value> {
    let Value::Array(items) = value else {
        issues.push(wrong_type(FieldType::TextList, path));
        return None;
    };

    let mut normalized = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.is_string() {
            normalized.push(item.clone());
        } else {
            issues.push(wrong_type(FieldType::Text, &format!("{path}[{i}]")));
        }
    }
    Some(Value::Array(normalized))
}

fn check_identifier_list(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<Value> {
    let Value::Array(items) = value else {
        issues.push(wrong_type(FieldType::ObjectIdList, path));
        return None;
    };

    let normalized = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| check_identifier(item, &format!("{path}[{i}]"), issues))
        .collect();
    Some(Value::Array(normalized))
}

fn wrong_type(ty: FieldType, path: &str) -> FieldIssue {
    FieldIssue::new(
        path,
        IssueKind::WrongType {
            expected: ty.to_string(),
        },
    )
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}
