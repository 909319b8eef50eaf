//! Error type for the storage layer.

use ems_core::error::EmsError;
use thiserror::Error;

/// Failures raised by the SurrealDB-backed repositories.
#[derive(Debug, Error)]
pub enum DbError {
    /// Transport or query failure from the driver.
    #[error("query failed: {0}")]
    Query(#[from] surrealdb::Error),

    /// A write collided with a unique index.
    #[error("{entity} already exists")]
    Duplicate { entity: String },

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt {entity} record: {detail}")]
    Decode { entity: String, detail: String },

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a statement-level write failure, separating
    /// unique-index violations from everything else so callers see
    /// them as duplicates on create and update alike.
    pub(crate) fn write(entity: &str, err: surrealdb::Error) -> Self {
        // SurrealDB reports an index violation as
        // "Database index `...` already contains ...".
        if err.to_string().contains("already contains") {
            DbError::Duplicate {
                entity: entity.into(),
            }
        } else {
            DbError::Query(err)
        }
    }

    pub(crate) fn decode(entity: &str, detail: impl Into<String>) -> Self {
        DbError::Decode {
            entity: entity.into(),
            detail: detail.into(),
        }
    }
}

impl From<DbError> for EmsError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EmsError::NotFound { entity, id },
            DbError::Duplicate { entity } => EmsError::AlreadyExists { entity },
            other => EmsError::Database(other.to_string()),
        }
    }
}
