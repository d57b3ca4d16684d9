//! `SQLite` implementation of [`LocalStore`].

use std::future::Future;

use sqlx::SqlitePool;

use timer24h_app::ports::LocalStore;
use timer24h_domain::error::TimerError;

use crate::error::StorageError;

const SELECT_BY_KEY: &str = "SELECT value FROM local_store WHERE key = ?";
const UPSERT: &str = "INSERT INTO local_store (key, value, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// `SQLite`-backed device-local key-value store.
#[derive(Clone)]
pub struct SqliteLocalStore {
    pool: SqlitePool,
}

impl SqliteLocalStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl LocalStore for SqliteLocalStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, TimerError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_BY_KEY)
                .bind(&key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(row.map(|(value,)| value))
        }
    }

    fn set(&self, key: &str, text: &str) -> impl Future<Output = Result<(), TimerError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        let text = text.to_string();
        async move {
            sqlx::query(UPSERT)
                .bind(&key)
                .bind(&text)
                .bind(timer24h_domain::time::now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }
}
