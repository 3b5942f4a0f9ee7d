//! Database-specific error types and conversions.

use merlinn_core::Entity;
use merlinn_core::error::MerlinnError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("{entity} record cannot be stored: {reason}")]
    Unstorable { entity: Entity, reason: String },
}

impl From<DbError> for MerlinnError {
    fn from(err: DbError) -> Self {
        MerlinnError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstorable_record_surfaces_as_database_error() {
        let err: MerlinnError = DbError::Unstorable {
            entity: Entity::Integration,
            reason: "embedded Vendor at `vendor` has no _id".into(),
        }
        .into();

        assert!(matches!(
            err,
            MerlinnError::Database(message)
                if message == "Integration record cannot be stored: \
                               embedded Vendor at `vendor` has no _id"
        ));
    }
}
