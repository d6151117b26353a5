//! Record store implementation using PostgreSQL.
//!
//! All records live in one `record_store` table keyed by text. Counters are
//! stored in the same keyspace as decimal text so that `keys()` sees them the
//! same way a Redis `KEYS *` would.

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::store::RecordStore;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS record_store (
    key TEXT PRIMARY KEY,
    value BYTEA NOT NULL
)";

// Single statement: the row lock taken by ON CONFLICT serializes concurrent increments.
const INCREMENT_SQL: &str = "INSERT INTO record_store (key, value) VALUES ($1, convert_to('1', 'UTF8'))
     ON CONFLICT (key) DO UPDATE
     SET value = convert_to((convert_from(record_store.value, 'UTF8')::bigint + 1)::text, 'UTF8')
     RETURNING convert_from(value, 'UTF8')::bigint";

/// Login details for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub username: String,
    pub password: Option<String>,
    pub database: String,
}

/// A record store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Opens a pool against `host:port`, creates the backing table if needed
    /// and pings the server. Any failure is a [`StoreError::Connection`].
    pub async fn connect(
        host: &str,
        port: u16,
        credentials: &StoreCredentials,
    ) -> StoreResult<Self> {
        let mut options = PgConnectOptions::new()
            .host(host)
            .port(port)
            .username(&credentials.username)
            .database(&credentials.database);
        if let Some(password) = credentials.password.as_deref() {
            options = options.password(password);
        }
        Self::connect_with(options).await
    }

    /// Same as [`connect`](Self::connect) but from a `postgres://` URL.
    pub async fn connect_url(url: &str) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(url)
            .map_err(|e| StoreError::connection("invalid store URL", e))?;
        Self::connect_with(options).await
    }

    async fn connect_with(options: PgConnectOptions) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::connection("failed to open connection pool", e))?;

        sqlx::query(CREATE_TABLE_SQL)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::connection("failed to prepare record_store table", e))?;

        let store = Self { pool };
        store.ping().await.map_err(|e| match e {
            StoreError::Backend(source) => StoreError::connection("ping failed", source),
            other => other,
        })?;
        tracing::info!("connected to record store");
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = sqlx::query_scalar::<_, Vec<u8>>("SELECT value FROM record_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO record_store (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = $2",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM record_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM record_store WHERE key = $1)",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM record_store")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    async fn increment(&self, counter_key: &str) -> StoreResult<u64> {
        let value = sqlx::query_scalar::<_, i64>(INCREMENT_SQL)
            .bind(counter_key)
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(value).map_err(|_| StoreError::CorruptCounter {
            key: counter_key.to_string(),
        })
    }

    async fn flush_all(&self) -> StoreResult<()> {
        sqlx::query("TRUNCATE TABLE record_store")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
