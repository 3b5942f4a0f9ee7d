//! Writing validated records into their tables.
//!
//! A record's `_id` becomes the SurrealDB record id rather than a column.
//! Timestamps arrive as RFC 3339 strings and are cast to `datetime`.
//! Embedded references are written as the identifier of the embedded record.

use merlinn_core::{Entity, FieldType, Record, SchemaRegistry};
use serde_json::Value;
use surrealdb::{Connection, Surreal};
use tracing::debug;

use crate::error::DbError;

/// A `CREATE` statement for one record, with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStatement {
    pub sql: String,
    pub bindings: Vec<(String, Value)>,
}

/// Builds the `CREATE` statement that stores `record`.
pub fn create_statement(
    registry: &SchemaRegistry,
    record: &Record,
) -> Result<CreateStatement, DbError> {
    let entity = record.entity();
    let unstorable = |reason: String| DbError::Unstorable { entity, reason };

    let table = entity
        .table()
        .ok_or_else(|| unstorable("it has no table of its own".into()))?;
    let value = record.to_value().map_err(|e| unstorable(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(unstorable("it does not render as an object".into()));
    };

    let schema = registry.schema(entity);
    let mut bindings = Vec::with_capacity(fields.len());
    let mut sets = Vec::with_capacity(fields.len());
    let mut target = table.to_owned();

    for (name, value) in fields {
        if value.is_null() {
            continue;
        }
        let ty = schema.field(&name).map(|spec| spec.ty);

        if name == "_id" {
            target = format!("type::record('{table}', $id)");
            bindings.push(("id".to_owned(), value));
            continue;
        }

        let param = format!("f{}", sets.len());
        match ty {
            Some(FieldType::Timestamp) => sets.push(format!("`{name}` = <datetime> ${param}")),
            _ => sets.push(format!("`{name}` = ${param}")),
        }

        let value = match ty {
            Some(FieldType::Reference(referenced)) => {
                reference_id(entity, referenced, &name, value)?
            }
            _ => value,
        };
        bindings.push((param, value));
    }

    let sql = if sets.is_empty() {
        format!("CREATE {target}")
    } else {
        format!("CREATE {target} SET {}", sets.join(", "))
    };

    Ok(CreateStatement { sql, bindings })
}

fn reference_id(
    entity: Entity,
    target: Entity,
    name: &str,
    value: Value,
) -> Result<Value, DbError> {
    match value {
        Value::Object(mut embedded) => match embedded.remove("_id") {
            Some(id @ Value::String(_)) => Ok(id),
            _ => Err(DbError::Unstorable {
                entity,
                reason: format!("embedded {target} at `{name}` has no _id"),
            }),
        },
        id => Ok(id),
    }
}

/// Stores a validated record in its table.
pub async fn store_record<C: Connection>(
    db: &Surreal<C>,
    registry: &SchemaRegistry,
    record: &Record,
) -> Result<(), DbError> {
    let statement = create_statement(registry, record)?;
    debug!(entity = %record.entity(), sql = %statement.sql, "Storing record");

    let mut query = db.query(&statement.sql);
    for binding in statement.bindings {
        query = query.bind(binding);
    }
    query.await?.check()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const ORG_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";
    const VENDOR_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f7";

    #[test]
    fn identity_becomes_the_record_id() {
        let registry = SchemaRegistry::default();
        let record = registry
            .validate(Entity::Organization, &json!({
                "_id": ORG_ID,
                "name": "Acme",
                "createdAt": "2024-03-01T12:00:00Z",
            }))
            .unwrap();

        let statement = create_statement(&registry, &record).unwrap();
        assert_eq!(
            statement.sql,
            "CREATE type::record('organization', $id) SET \
             `createdAt` = <datetime> $f0, `name` = $f1"
        );
        assert_eq!(statement.bindings[0], ("id".to_owned(), json!(ORG_ID)));
        assert!(!statement.sql.contains("`_id`"));
    }

    #[test]
    fn embedded_references_collapse_to_identifiers() {
        let registry = SchemaRegistry::default();
        let record = registry
            .validate(Entity::Integration, &json!({
                "vendor": { "_id": VENDOR_ID, "name": "Jira", "description": "Tickets" },
                "organization": ORG_ID,
                "metadata": {},
            }))
            .unwrap();

        let statement = create_statement(&registry, &record).unwrap();
        assert!(statement.bindings.iter().any(|(_, value)| *value == json!(VENDOR_ID)));
        assert!(statement.bindings.iter().all(|(_, value)| value.get("name").is_none()));
    }

    #[test]
    fn embedded_reference_without_identity_is_unstorable() {
        let registry = SchemaRegistry::default();
        let record = registry
            .validate(Entity::Integration, &json!({
                "vendor": { "name": "Jira", "description": "Tickets" },
                "organization": ORG_ID,
                "metadata": {},
            }))
            .unwrap();

        let err = create_statement(&registry, &record).unwrap_err();
        assert!(matches!(err, DbError::Unstorable { entity: Entity::Integration, .. }));
    }

    #[test]
    fn embedded_only_entities_are_unstorable() {
        let registry = SchemaRegistry::default();
        let record = registry
            .validate(Entity::IndexState, &json!({ "status": "pending", "integrations": {} }))
            .unwrap();

        assert!(create_statement(&registry, &record).is_err());
    }
}
