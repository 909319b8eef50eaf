//! SurrealDB implementation of [`SessionRepository`].
//!
//! The record key is the opaque session identifier, so identifier
//! uniqueness is enforced by the table itself.

use chrono::{DateTime, Utc};
use ems_core::error::EmsResult;
use ems_core::models::session::{CreateSession, Session};
use ems_core::repository::SessionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    user_id: String,
    expires_at: DateTime<Utc>,
    is_active: bool,
    user_agent: Option<String>,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

fn row_to_session(row: SessionRow, session_id: String) -> Result<Session, DbError> {
    let user_id = Uuid::parse_str(&row.user_id)
        .map_err(|e| DbError::decode("session", format!("invalid user UUID: {e}")))?;
    Ok(Session {
        session_id,
        user_id,
        expires_at: row.expires_at,
        is_active: row.is_active,
        user_agent: row.user_agent,
        ip_address: row.ip_address,
        created_at: row.created_at,
    })
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Session repository.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn create(&self, input: CreateSession) -> EmsResult<Session> {
        let session_id = input.session_id.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('session', $id) SET \
                 user_id = $user_id, \
                 expires_at = $expires_at, \
                 is_active = true, \
                 user_agent = $user_agent, \
                 ip_address = $ip_address",
            )
            .bind(("id", session_id.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("expires_at", input.expires_at))
            .bind(("user_agent", input.user_agent))
            .bind(("ip_address", input.ip_address))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::write("session", e))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: session_id.clone(),
        })?;

        row_to_session(row, session_id).map_err(Into::into)
    }

    async fn get(&self, session_id: &str) -> EmsResult<Session> {
        let id = session_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('session', $id)")
            .bind(("id", id.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id.clone(),
        })?;

        row_to_session(row, id).map_err(Into::into)
    }

    async fn invalidate(&self, session_id: &str) -> EmsResult<()> {
        // UPDATE on a missing record is a no-op — logout stays
        // idempotent.
        self.db
            .query("UPDATE type::record('session', $id) SET is_active = false")
            .bind(("id", session_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete_expired(&self) -> EmsResult<u64> {
        // Count expired sessions first, then delete.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM session \
                 WHERE expires_at < time::now() \
                 GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE session WHERE expires_at < time::now()")
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
