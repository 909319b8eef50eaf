//! Session domain model.
//!
//! A session is the server-side record of one authenticated login,
//! revocable independently of any access token that references it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque random identifier (64 lowercase hex chars, 256 bits of
    /// entropy). Globally unique.
    pub session_id: String,
    pub user_id: Uuid,
    /// Hard expiry. The session is invalid from this instant on, even
    /// while `is_active` is still true.
    pub expires_at: DateTime<Utc>,
    /// Cleared on logout. The record is kept until the reaper deletes
    /// it after expiry.
    pub is_active: bool,
    /// Client metadata — informational only, never used for validation.
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is valid only while active and before its expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub session_id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
