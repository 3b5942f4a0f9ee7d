//! Migration runner error types.

use merlinn_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Database(#[from] DbError),
}
