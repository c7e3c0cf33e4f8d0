use climate_api_core::is_file;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use super::{TableSchema, TABLES};

/// Startup failures: the process cannot serve any route when one of these occurs.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database file not found: {0}")]
    MissingFile(String),
    #[error("Failed to open database: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Table `{0}` not found in database")]
    MissingTable(&'static str),
    #[error("Table `{table}` is missing column `{column}`")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("Database integrity check failed: {0}")]
    Integrity(String),
}

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Process-wide, read-only handle to the climate dataset.
///
/// Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(path: &str, options: DatabaseOptions) -> Result<Self, StorageError> {
        if !is_file(path) {
            return Err(StorageError::MissingFile(path.to_owned()));
        }

        let connect_options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        let db = Self { pool };
        db.validate_schema().await?;
        db.health_check().await?;
        info!(
            "SQLite database opened read-only at: {} (max connections: {})",
            path, options.max_connections
        );

        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn validate_schema(&self) -> Result<(), StorageError> {
        for table in TABLES {
            self.validate_table(&table).await?;
        }
        Ok(())
    }

    async fn validate_table(&self, table: &TableSchema) -> Result<(), StorageError> {
        let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
            .bind(table.name)
            .fetch_all(&self.pool)
            .await?;

        if columns.is_empty() {
            return Err(StorageError::MissingTable(table.name));
        }

        for &column in table.columns {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                return Err(StorageError::MissingColumn {
                    table: table.name,
                    column,
                });
            }
        }
        debug!("table `{}` matches declared schema", table.name);

        Ok(())
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<(), StorageError> {
        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await?;
        if result != "ok" {
            return Err(StorageError::Integrity(result));
        }

        Ok(())
    }

    /// Wait for checked-out connections to be returned, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite connection pool closed");
    }
}
