//! `SQLite` backend: one `kv_entries` table behind `KeyValueStore`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;
use tracing::debug;

use crate::repository::{KeyValueStore, Storage};

mod kv_repo;
mod migrate;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteKvStore {
    /// Connect and bring the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is invalid, the database cannot
    /// be reached, or a migration fails.
    pub async fn open(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Connect without touching the schema.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is invalid or the database cannot
    /// be reached.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        // Progress is a single row; one writer avoids lock contention and
        // keeps `sqlite::memory:` on one connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;
        debug!(url = database_url, "sqlite connected");
        Ok(Self { pool })
    }

    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration query fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Storage whose key-value entries live in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if `SqliteKvStore::open` fails.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::open(database_url).await?);
        Ok(Self { kv })
    }
}
