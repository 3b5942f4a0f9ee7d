//! Schema definitions and migration runner for SurrealDB.
//!
//! Table definitions are generated from the core field declarations, so the
//! store enforces the same contract as record validation. All tables use
//! SCHEMAFULL mode. Enumerations are stored as strings with ASSERT
//! constraints. Relations are stored in identifier form only; embedded
//! copies are a read-side representation and never persisted.
//!
//! `_id` is the SurrealDB record id, not a column, and timestamps are
//! `datetime` columns. Validated records are written through
//! [`crate::store_record`], which maps both.

use merlinn_core::models::ObjectId;
use merlinn_core::{Entity, FieldSpec, FieldType, SchemaRegistry};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: fn() -> String,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: schema_v1,
}];

// -----------------------------------------------------------------------
// Schema v1 — record tables
// -----------------------------------------------------------------------

struct UniqueIndex {
    entity: Entity,
    name: &'static str,
    columns: &'static [&'static str],
}

/// One plan state per (plan, organization) pair.
const UNIQUE_INDEXES: &[UniqueIndex] = &[UniqueIndex {
    entity: Entity::PlanState,
    name: "idx_plan_state_plan_org",
    columns: &["plan", "organization"],
}];

/// Returns the DDL of schema version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that bypass the
/// migration runner.
pub fn schema_v1() -> String {
    let registry = SchemaRegistry::default();
    let mut ddl = String::new();

    for schema in registry.schemas() {
        let Some(table) = schema.entity.table() else {
            continue;
        };

        ddl.push_str(&format!(
            "-- {entity}\nDEFINE TABLE {table} SCHEMAFULL;\n",
            entity = schema.entity
        ));
        define_fields(&mut ddl, &registry, table, &[], &schema.fields);

        for index in UNIQUE_INDEXES.iter().filter(|i| i.entity == schema.entity) {
            let columns: Vec<String> = index.columns.iter().map(|c| quote(&[*c])).collect();
            ddl.push_str(&format!(
                "DEFINE INDEX {name} ON TABLE {table} COLUMNS {columns} UNIQUE;\n",
                name = index.name,
                columns = columns.join(", "),
            ));
        }
        ddl.push('\n');
    }

    ddl
}

fn define_fields(
    ddl: &mut String,
    registry: &SchemaRegistry,
    table: &str,
    parent: &[&str],
    fields: &[FieldSpec],
) {
    for spec in fields {
        // The store keeps its own record id.
        if spec.name == "_id" {
            continue;
        }

        let mut path = parent.to_vec();
        path.push(spec.name);

        ddl.push_str(&format!(
            "DEFINE FIELD {field} ON TABLE {table} {clause};\n",
            field = quote(&path),
            clause = field_clause(spec),
        ));

        if let FieldType::Embedded(entity) = spec.ty {
            define_fields(ddl, registry, table, &path, &registry.schema(entity).fields);
        }
    }
}

fn field_clause(spec: &FieldSpec) -> String {
    let (ty, assert) = match spec.ty {
        FieldType::Timestamp => return "TYPE datetime DEFAULT time::now()".into(),
        FieldType::Text => ("string", None),
        FieldType::Boolean => ("bool", None),
        FieldType::Mapping | FieldType::Embedded(_) => ("object", None),
        FieldType::TextList | FieldType::ObjectIdList => ("array<string>", None),
        FieldType::Scalar => ("int | bool | string", None),
        FieldType::OneOf(allowed) => {
            let options: Vec<String> = allowed.iter().map(|v| format!("'{v}'")).collect();
            ("string", Some(format!("$value IN [{}]", options.join(", "))))
        }
        FieldType::ObjectId | FieldType::Reference(_) => (
            "string",
            Some(format!("string::len($value) = {}", ObjectId::LEN)),
        ),
    };

    let mut clause = match spec.default {
        Some(default) => format!("TYPE {ty} DEFAULT '{default}'"),
        None if spec.required => format!("TYPE {ty}"),
        None => format!("TYPE option<{ty}>"),
    };

    if spec.ty == FieldType::Mapping {
        clause.push_str(" FLEXIBLE");
    }

    if let Some(assert) = assert {
        if spec.required || spec.default.is_some() {
            clause.push_str(&format!(" ASSERT {assert}"));
        } else {
            clause.push_str(&format!(" ASSERT $value = NONE OR {assert}"));
        }
    }

    clause
}

/// Renders a field path with every segment escaped.
fn quote(path: &[&str]) -> String {
    path.iter()
        .map(|segment| format!("`{segment}`"))
        .collect::<Vec<_>>()
        .join(".")
}

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB instance.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query((migration.sql)()).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn every_stored_entity_gets_a_table() {
        let ddl = schema_v1();
        for entity in Entity::ALL {
            match entity.table() {
                Some(table) => assert!(
                    ddl.contains(&format!("DEFINE TABLE {table} SCHEMAFULL;")),
                    "missing table {table}"
                ),
                None => assert!(!ddl.contains("DEFINE TABLE index_state")),
            }
        }
    }

    #[test]
    fn enumerations_are_asserted() {
        let ddl = schema_v1();
        assert!(ddl.contains(
            "DEFINE FIELD `status` ON TABLE user TYPE string \
             ASSERT $value IN ['activated', 'invited'];"
        ));
        assert!(ddl.contains(
            "DEFINE FIELD `state`.`status` ON TABLE db_index TYPE string \
             ASSERT $value IN ['pending', 'completed', 'failed'];"
        ));
    }

    #[test]
    fn field_clauses_follow_declarations() {
        let ddl = schema_v1();
        assert!(ddl.contains(
            "DEFINE FIELD `vendor` ON TABLE integration TYPE string \
             ASSERT string::len($value) = 24;"
        ));
        assert!(ddl.contains(
            "DEFINE FIELD `credentials` ON TABLE integration TYPE option<object> FLEXIBLE;"
        ));
        assert!(ddl.contains("DEFINE FIELD `resetMode` ON TABLE plan_field TYPE string DEFAULT 'manual';"));
        assert!(ddl.contains("DEFINE FIELD `canExceedLimit` ON TABLE plan_field TYPE option<bool>;"));
        assert!(ddl.contains(
            "DEFINE FIELD `initialValue` ON TABLE plan_field TYPE int | bool | string;"
        ));
        assert!(ddl.contains("DEFINE FIELD `createdAt` ON TABLE vendor TYPE datetime DEFAULT time::now();"));
        assert!(!ddl.contains("`_id`"));
    }

    #[test]
    fn unique_indexes_are_declared() {
        let ddl = schema_v1();
        assert!(ddl.contains(
            "DEFINE INDEX idx_plan_state_plan_org ON TABLE plan_state \
             COLUMNS `plan`, `organization` UNIQUE;"
        ));
        assert_eq!(ddl.matches(" UNIQUE;").count(), 1);
        assert!(!ddl.contains("idx_vendor_name"));
    }
}
