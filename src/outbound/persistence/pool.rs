//! r2d2 connection pool for Diesel SQLite connections.
//!
//! # Design
//!
//! - Every checked-out connection gets WAL journaling, a busy timeout, and
//!   foreign-key enforcement via PRAGMAs. The busy timeout is what lets
//!   concurrent writers queue on SQLite's single write lock instead of
//!   failing fast with `SQLITE_BUSY`.
//! - Embedded migrations run once at pool construction.
//! - Diesel's SQLite connections are synchronous; adapters run their work on
//!   the Tokio blocking pool and expose async port traits.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

/// Migrations compiled into the binary from the `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool or run migrations.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_path: String,
    max_size: u32,
    busy_timeout_ms: u32,
}

impl PoolConfig {
    /// Create a configuration for the given SQLite database path.
    ///
    /// Defaults: 8 connections, 5 second busy timeout.
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            max_size: 8,
            busy_timeout_ms: 5_000,
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Database path the pool will open.
    pub fn database_path(&self) -> &str {
        &self.database_path
    }
}

/// Applies the per-connection PRAGMA set on checkout.
#[derive(Debug, Clone, Copy)]
struct ConnectionTuning {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionTuning {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; \
             PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Shared connection pool handed to persistence adapters.
#[derive(Clone)]
pub struct DbPool {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl DbPool {
    /// Build the pool and run any pending migrations.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_path());
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_customizer(Box::new(ConnectionTuning {
                busy_timeout_ms: config.busy_timeout_ms,
            }))
            .build(manager)
            .map_err(|error| PoolError::build(error.to_string()))?;

        let mut conn = pool
            .get()
            .map_err(|error| PoolError::build(error.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| PoolError::build(error.to_string()))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied database migrations");
        }

        Ok(Self { pool })
    }

    /// Check out a connection. Blocking; call from the blocking pool.
    pub fn get(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, PoolError> {
        self.pool
            .get()
            .map_err(|error| PoolError::checkout(error.to_string()))
    }
}
