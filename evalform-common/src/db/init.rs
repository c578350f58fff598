//! Database initialization
//!
//! Opens (creating if needed) the SQLite database, bounds the connection
//! pool, creates the evaluations table from the record schema and adds any
//! columns an older database is missing.

use crate::db::schema_sync::TableSchema;
use crate::db::table_schemas::{sync_all_table_schemas, EvaluationsTableSchema};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Connection pool limits
///
/// Every wait is bounded: pool exhaustion fails after `acquire_timeout`
/// and a locked database fails after `busy_timeout`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: crate::config::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(crate::config::DEFAULT_ACQUIRE_TIMEOUT_SECS),
            busy_timeout: Duration::from_millis(crate::config::DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Open the on-disk database and bring its schema up to date
pub async fn init_database(db_path: &Path, settings: &PoolSettings) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    migrate(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the evaluations table
///
/// One connection that never expires: every pooled connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = init_in_memory_unmigrated().await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with no tables
pub async fn init_in_memory_unmigrated() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the evaluations table if absent, then add missing columns
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    create_evaluations_table(pool).await?;
    sync_all_table_schemas(pool).await?;
    Ok(())
}

async fn create_evaluations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(&EvaluationsTableSchema::create_table_sql())
        .execute(pool)
        .await?;
    Ok(())
}
