//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings, calendar dates as `YYYY-MM-DD` strings, and enums as
//! strings with ASSERT constraints.

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
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD slug ON TABLE tenant TYPE string;
DEFINE FIELD subscription_tier ON TABLE tenant TYPE string \
    ASSERT $value IN ['Starter', 'Professional', 'Enterprise'];
DEFINE FIELD subscription_status ON TABLE tenant TYPE string \
    ASSERT $value IN ['Trialing', 'Active', 'PastDue', 'Cancelled', \
    'Expired'];
DEFINE FIELD trial_ends_at ON TABLE tenant TYPE option<datetime>;
DEFINE FIELD metadata ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_slug ON TABLE tenant COLUMNS slug UNIQUE;

-- =======================================================================
-- Users and profiles
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE option<string>;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Owner', 'Admin', 'Manager', 'Technician', 'Viewer'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_tenant ON TABLE user COLUMNS tenant_id;

DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE profile TYPE option<string>;
DEFINE FIELD full_name ON TABLE profile TYPE string;
DEFINE FIELD phone ON TABLE profile TYPE option<string>;
DEFINE FIELD job_title ON TABLE profile TYPE option<string>;
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Equipment (tenant scope)
-- =======================================================================
DEFINE TABLE equipment SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE equipment TYPE string;
DEFINE FIELD project_id ON TABLE equipment TYPE option<string>;
DEFINE FIELD name ON TABLE equipment TYPE string;
DEFINE FIELD category ON TABLE equipment TYPE string;
DEFINE FIELD serial_number ON TABLE equipment TYPE option<string>;
DEFINE FIELD status ON TABLE equipment TYPE string \
    ASSERT $value IN ['Available', 'InUse', 'Maintenance', 'Retired'];
DEFINE FIELD last_maintenance ON TABLE equipment TYPE option<string>;
DEFINE FIELD next_maintenance ON TABLE equipment TYPE option<string>;
DEFINE FIELD certification_required ON TABLE equipment TYPE bool \
    DEFAULT false;
DEFINE FIELD certification_expiry ON TABLE equipment TYPE option<string>;
DEFINE FIELD last_inspection ON TABLE equipment TYPE option<string>;
DEFINE FIELD next_inspection ON TABLE equipment TYPE option<string>;
DEFINE FIELD compliance_status ON TABLE equipment TYPE string \
    ASSERT $value IN ['Compliant', 'DueSoon', 'NonCompliant', 'Unknown'];
DEFINE FIELD created_at ON TABLE equipment TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE equipment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_equipment_tenant ON TABLE equipment COLUMNS tenant_id;

-- =======================================================================
-- Projects (tenant scope)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE project TYPE string;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE string;
DEFINE FIELD location ON TABLE project TYPE option<string>;
DEFINE FIELD status ON TABLE project TYPE string \
    ASSERT $value IN ['Planning', 'Active', 'OnHold', 'Completed'];
DEFINE FIELD start_date ON TABLE project TYPE option<string>;
DEFINE FIELD end_date ON TABLE project TYPE option<string>;
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_tenant ON TABLE project COLUMNS tenant_id;

-- =======================================================================
-- Compliance alerts (tenant scope)
-- =======================================================================
DEFINE TABLE alert SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE alert TYPE string;
DEFINE FIELD equipment_id ON TABLE alert TYPE string;
DEFINE FIELD equipment_name ON TABLE alert TYPE string;
DEFINE FIELD alert_type ON TABLE alert TYPE string \
    ASSERT $value IN ['Maintenance', 'Certification', 'Inspection'];
DEFINE FIELD due_date ON TABLE alert TYPE string;
DEFINE FIELD priority ON TABLE alert TYPE string \
    ASSERT $value IN ['Low', 'Medium', 'High', 'Critical'];
DEFINE FIELD status ON TABLE alert TYPE string \
    ASSERT $value IN ['Open', 'Acknowledged', 'Resolved'];
DEFINE FIELD description ON TABLE alert TYPE string;
DEFINE FIELD created_at ON TABLE alert TYPE datetime;
DEFINE FIELD updated_at ON TABLE alert TYPE datetime;
DEFINE FIELD resolved_at ON TABLE alert TYPE option<datetime>;
DEFINE INDEX idx_alert_key ON TABLE alert \
    COLUMNS tenant_id, alert_type, equipment_id, due_date UNIQUE;

DEFINE TABLE alert_snapshot SCHEMAFULL;
DEFINE FIELD fingerprint ON TABLE alert_snapshot TYPE string;
DEFINE FIELD updated_at ON TABLE alert_snapshot TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Notifications (tenant scope)
-- =======================================================================
DEFINE TABLE notification SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE notification TYPE string;
DEFINE FIELD title ON TABLE notification TYPE string;
DEFINE FIELD message ON TABLE notification TYPE string;
DEFINE FIELD priority ON TABLE notification TYPE string \
    ASSERT $value IN ['Low', 'Medium', 'High', 'Critical'];
DEFINE FIELD alert_id ON TABLE notification TYPE option<string>;
DEFINE FIELD read ON TABLE notification TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_notification_tenant ON TABLE notification \
    COLUMNS tenant_id;

-- =======================================================================
-- Vendor webhooks (tenant scope)
-- =======================================================================
DEFINE TABLE vendor_webhook SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE vendor_webhook TYPE string;
DEFINE FIELD vendor_name ON TABLE vendor_webhook TYPE string;
DEFINE FIELD url ON TABLE vendor_webhook TYPE string;
DEFINE FIELD events ON TABLE vendor_webhook TYPE array<string>;
DEFINE FIELD secret_hash ON TABLE vendor_webhook TYPE string;
DEFINE FIELD enabled ON TABLE vendor_webhook TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE vendor_webhook TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE vendor_webhook TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Onboarding (record id = tenant id)
-- =======================================================================
DEFINE TABLE onboarding_state SCHEMAFULL;
DEFINE FIELD completed_steps ON TABLE onboarding_state TYPE array<string>;
DEFINE FIELD current_step ON TABLE onboarding_state TYPE option<string>;
DEFINE FIELD completed ON TABLE onboarding_state TYPE bool DEFAULT false;
DEFINE FIELD updated_at ON TABLE onboarding_state TYPE datetime \
    DEFAULT time::now();
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
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

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
