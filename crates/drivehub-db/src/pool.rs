//! # Database Handle
//!
//! Opens the DriveHub SQLite file and hands out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_database_path() / DRIVEHUB_DB_PATH                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig ──connect_options()──► SqliteConnectOptions (WAL, FK on)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new ──► pool ──► migrations (unless disabled)                │
//! │       │                                                                 │
//! │       ├──► vehicles()  catalog                                          │
//! │       └──► bookings()  owner ledger                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::booking::BookingRepository;
use crate::repository::vehicle::VehicleRepository;

const MEMORY_PATH: &str = ":memory:";

/// Where the store lives and how the pool around it behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/drivehub/drivehub.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// A single CLI command seldom holds more than one or two.
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long to wait for a free connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            run_migrations: true,
        }
    }

    /// Throwaway store for tests.
    ///
    /// Pinned to one connection: every SQLite memory connection is a
    /// separate database.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(self, max_connections: u32) -> Self {
        DbConfig { max_connections, ..self }
    }

    pub fn min_connections(self, min_connections: u32) -> Self {
        DbConfig { min_connections, ..self }
    }

    pub fn connect_timeout(self, connect_timeout: Duration) -> Self {
        DbConfig { connect_timeout, ..self }
    }

    pub fn run_migrations(self, run_migrations: bool) -> Self {
        DbConfig { run_migrations, ..self }
    }

    fn is_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    /// SQLite pragmas applied to every pooled connection.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            // SQLite leaves foreign keys off unless asked
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal);

        // WAL needs a real file
        Ok(if self.is_memory() {
            options
        } else {
            options.journal_mode(SqliteJournalMode::Wal)
        })
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(Some(self.idle_timeout))
    }
}

/// Shared handle over the pool. Clones share connections.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening DriveHub store");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max = config.max_connections, memory = config.is_memory(), "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Safe to call repeatedly; applied versions are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn vehicles(&self) -> VehicleRepository {
        VehicleRepository::new(self.pool.clone())
    }

    pub fn bookings(&self) -> BookingRepository {
        BookingRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        debug!("Closing DriveHub store");
        self.pool.close().await;
    }

    /// `true` while the store answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
