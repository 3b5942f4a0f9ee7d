//! Integration tests for schema installation using in-memory SurrealDB.

use merlinn_core::{Entity, SchemaRegistry};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

const ORG_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";
const VENDOR_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f7";
const PLAN_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f9";
const INTEGRATION_ID: &str = "65a1f0c2e4b0a1b2c3d4e5fa";

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    merlinn_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = setup().await;

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    for table in Entity::ALL.into_iter().filter_map(Entity::table) {
        assert!(info_str.contains(table), "missing {table} table");
    }
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = setup().await;

    merlinn_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn can_create_records_after_migration() {
    let db = setup().await;

    db.query(
        "CREATE organization SET name = 'Acme'; \
         CREATE user SET \
         auth0Id = 'auth0|123', \
         email = 'a@b.com', \
         status = 'invited', \
         role = 'owner', \
         organization = $org",
    )
    .bind(("org", ORG_ID))
    .await
    .unwrap()
    .check()
    .unwrap();

    let mut result = db
        .query("SELECT * FROM user WHERE email = 'a@b.com'")
        .await
        .unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn user_status_outside_the_set_is_rejected() {
    let db = setup().await;

    let result = db
        .query(
            "CREATE user SET \
             auth0Id = 'auth0|123', \
             email = 'a@b.com', \
             status = 'pending', \
             role = 'owner', \
             organization = $org",
        )
        .bind(("org", ORG_ID))
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "status 'pending' should violate the ASSERT");
}

#[tokio::test]
async fn short_reference_is_rejected() {
    let db = setup().await;

    let result = db
        .query(
            "CREATE integration SET \
             vendor = 'abc', \
             organization = $org, \
             metadata = {}",
        )
        .bind(("org", ORG_ID))
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "a 3-character reference should be rejected");
}

#[tokio::test]
async fn plan_field_reset_mode_defaults_to_manual() {
    let db = setup().await;

    db.query(
        "CREATE plan_field SET \
         name = 'Indexing attempts', \
         code = 'indexingAttempts', \
         kind = 'counter', \
         initialValue = 0, \
         granularity = 'month'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let mut result = db
        .query("SELECT VALUE resetMode FROM plan_field")
        .await
        .unwrap();
    let modes: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(modes.len(), 1);
    assert!(format!("{:?}", modes[0]).contains("manual"));
}

#[tokio::test]
async fn duplicate_vendor_names_are_allowed() {
    let db = setup().await;

    for description in ["Incidents", "Again"] {
        db.query("CREATE vendor SET name = 'PagerDuty', description = $description")
            .bind(("description", description))
            .await
            .unwrap()
            .check()
            .unwrap();
    }

    let mut result = db.query("SELECT * FROM vendor").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn unique_index_prevents_duplicate_plan_states() {
    let db = setup().await;
    let create = "CREATE plan_state SET plan = $plan, organization = $org, state = {}";

    db.query(create)
        .bind(("plan", PLAN_ID))
        .bind(("org", ORG_ID))
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query(create)
        .bind(("plan", PLAN_ID))
        .bind(("org", ORG_ID))
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "a second state for the same pair should be rejected");
}

#[tokio::test]
async fn validated_record_is_accepted_by_the_store() {
    let db = setup().await;
    let registry = SchemaRegistry::default();

    let record = registry
        .validate(
            Entity::Integration,
            &json!({
                "_id": INTEGRATION_ID,
                "vendor": { "_id": VENDOR_ID, "name": "PagerDuty", "description": "Incidents" },
                "organization": ORG_ID,
                "credentials": { "token": "ref:vault/pagerduty" },
                "metadata": { "service": "P123" },
                "createdAt": "2024-03-01T12:00:00Z",
                "updatedAt": "2024-03-02T08:30:00+02:00",
                "ignored": true,
            }),
        )
        .unwrap();

    merlinn_db::store_record(&db, &registry, &record).await.unwrap();

    let mut result = db
        .query("SELECT VALUE vendor FROM type::record('integration', $id)")
        .bind(("id", INTEGRATION_ID))
        .await
        .unwrap();
    let vendors: Vec<String> = result.take(0).unwrap();
    assert_eq!(vendors, vec![VENDOR_ID.to_owned()]);
}

#[tokio::test]
async fn validated_record_without_identity_gets_store_timestamps() {
    let db = setup().await;
    let registry = SchemaRegistry::default();

    let record = registry
        .validate(Entity::Organization, &json!({ "name": "Acme" }))
        .unwrap();
    merlinn_db::store_record(&db, &registry, &record).await.unwrap();

    let mut result = db
        .query("SELECT VALUE createdAt FROM organization")
        .await
        .unwrap();
    let stamps: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(stamps.len(), 1);
}
