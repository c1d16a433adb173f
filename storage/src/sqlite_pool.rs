//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Manages a single SQLite pool; creates the DB file if missing.
///
/// Accepts `sqlite::memory:` for tests as well as plain file paths.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (file path or in-memory).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database exists per connection; a pool of one keeps
        // every statement on the same database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
