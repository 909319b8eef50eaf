//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. The session record key is the
//! opaque session identifier itself.

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
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (identity + credentials)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['admin', 'employee'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Sessions (record key = opaque session identifier)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD is_active ON TABLE session TYPE bool DEFAULT true;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_expires_at ON TABLE session \
    COLUMNS expires_at;

-- =======================================================================
-- Employees
-- =======================================================================
DEFINE TABLE employee SCHEMAFULL;
DEFINE FIELD name ON TABLE employee TYPE string;
DEFINE FIELD email ON TABLE employee TYPE string;
DEFINE FIELD position ON TABLE employee TYPE string;
DEFINE FIELD department ON TABLE employee TYPE string;
DEFINE FIELD salary ON TABLE employee TYPE float;
DEFINE FIELD user_id ON TABLE employee TYPE option<string>;
DEFINE FIELD created_at ON TABLE employee TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE employee TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_employee_email ON TABLE employee COLUMNS email UNIQUE;

-- =======================================================================
-- Attendance (one entry per employee per date)
-- =======================================================================
DEFINE TABLE attendance SCHEMAFULL;
DEFINE FIELD employee_id ON TABLE attendance TYPE string;
DEFINE FIELD date ON TABLE attendance TYPE string;
DEFINE FIELD status ON TABLE attendance TYPE string \
    ASSERT $value IN ['Present', 'Absent', 'Leave'];
DEFINE FIELD created_at ON TABLE attendance TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE attendance TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_attendance_employee_date ON TABLE attendance \
    COLUMNS employee_id, date UNIQUE;

-- =======================================================================
-- Payroll (derived fields recomputed on every write; deliberately no
-- uniqueness over employee/month/year — corrections are allowed)
-- =======================================================================
DEFINE TABLE payroll SCHEMAFULL;
DEFINE FIELD employee_id ON TABLE payroll TYPE string;
DEFINE FIELD month ON TABLE payroll TYPE int;
DEFINE FIELD year ON TABLE payroll TYPE int;
DEFINE FIELD basic_salary ON TABLE payroll TYPE float;
DEFINE FIELD bonuses ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD special_allowance ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD income_tax ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD deductions ON TABLE payroll TYPE array DEFAULT [];
DEFINE FIELD deductions.* ON TABLE payroll TYPE object FLEXIBLE;
DEFINE FIELD hra ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD pf ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD esi ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD professional_tax ON TABLE payroll TYPE float DEFAULT 0;
DEFINE FIELD net_salary ON TABLE payroll TYPE float;
DEFINE FIELD created_at ON TABLE payroll TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE payroll TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_payroll_employee ON TABLE payroll COLUMNS employee_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
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

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
