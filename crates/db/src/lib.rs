//! Transactional store for the PawRes shelter tracker.
//!
//! A single shared embedded SQLite database accessed by concurrent request
//! handlers. Mutations go through [`Store::run_in_transaction`] on a writer
//! pool capped at one connection, which serializes write transactions: a
//! re-read performed inside a transaction always observes the latest
//! committed state, so read-then-decide patterns (adoption approval) are
//! race-free without explicit row locking. Reads use a separate pool.

pub mod models;
pub mod repositories;

use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqliteConnection;

pub type DbPool = sqlx::SqlitePool;

/// Embedded migrations, applied at startup and by test fixtures.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// How long a connection waits on the database write lock before failing.
/// A timeout surfaces as a retryable database error, never a hang.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reader pool size. The writer pool is always one connection.
const READER_CONNECTIONS: u32 = 8;

/// Handle to the embedded store: one serialized writer, pooled readers.
#[derive(Clone)]
pub struct Store {
    writer: DbPool,
    reader: DbPool,
}

impl Store {
    /// Open (creating if missing) the database at `url`, e.g.
    /// `sqlite://data/pawres.db`, with WAL journaling and enforced foreign
    /// keys.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::debug!(url, "store opened (single writer, pooled readers)");
        Ok(Self { writer, reader })
    }

    /// Build a store over an existing pool (test fixtures). The pool serves
    /// both roles; transaction serialization then depends on its size, so
    /// concurrency tests use [`Store::connect`] instead.
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            writer: pool.clone(),
            reader: pool,
        }
    }

    /// Pool for plain reads outside any transaction.
    pub fn reader(&self) -> &DbPool {
        &self.reader
    }

    /// Pool for single-statement writes that need no transaction (plain
    /// field edits). Workflow mutations go through
    /// [`run_in_transaction`](Store::run_in_transaction) instead.
    pub fn writer(&self) -> &DbPool {
        &self.writer
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.writer).await
    }

    /// Cheap connectivity probe.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.reader)
            .await?;
        Ok(())
    }

    /// Execute `op` as one atomic unit on the writer connection.
    ///
    /// The closure receives the transaction's connection; any error rolls
    /// the whole transaction back and propagates, a successful return
    /// commits. Helpers called inside take `&mut SqliteConnection`, so
    /// nested work reuses the outer transaction rather than opening its own.
    pub async fn run_in_transaction<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<sqlx::Error> + Send,
    {
        let mut tx = self.writer.begin().await.map_err(E::from)?;
        match op(&mut *tx).await {
            Ok(value) => {
                tx.commit().await.map_err(E::from)?;
                Ok(value)
            }
            Err(err) => {
                // Explicit rollback so failures surface here rather than in
                // the pool's drop path; the drop guard remains the fallback.
                tx.rollback().await.map_err(E::from)?;
                Err(err)
            }
        }
    }
}
