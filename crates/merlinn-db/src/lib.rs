//! Merlinn Database — the record contract expressed as SurrealDB schema.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Table definitions generated from the core declarations and their
//!   migration runner ([`schema_v1`], [`run_migrations`])
//! - Writing validated records ([`store_record`], [`create_statement`])
//! - Error types ([`DbError`])

mod connection;
mod error;
mod schema;
mod store;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use store::{CreateStatement, create_statement, store_record};
