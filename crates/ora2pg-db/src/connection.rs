//! `ConnectionProvider` (spec §4.4): scoped acquisition of Oracle and
//! PostgreSQL connections with guaranteed release on every exit path.
//!
//! The PostgreSQL side is grounded on `n8n-db::{connect, DbConfig}`
//! (`PgPoolOptions` with the same pool-tuning knobs). The Oracle side has no
//! teacher counterpart (the teacher never touches Oracle), so it is grounded
//! on `other_examples/...rainfrog...oracle-mod.rs`, which wraps the same
//! synchronous `oracle` crate's `Pool`/`Connection` in `tokio::spawn`. Here
//! every blocking call goes through `tokio::task::spawn_blocking` rather than
//! `tokio::spawn`, since the pool is shared across many scoped callers rather
//! than driving one interactive REPL task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::RwLock;

use crate::error::DbError;

/// Raw connection settings. Lives in this crate (rather than being owned by
/// `ora2pg-server`'s `ConfigStore`) so `ora2pg-db` has no upward dependency;
/// `ConfigStore` pushes settings down via `reconfigure`.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    pub oracle_connect_string: Option<String>,
    pub oracle_user: Option<String>,
    pub oracle_password: Option<String>,
    pub postgres_url: Option<String>,
}

/// `{connected, connectionTimeMs, databaseProductName, databaseProductVersion, message?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    pub connected: bool,
    pub connection_time_ms: u64,
    pub database_product_name: String,
    pub database_product_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Produces short-lived, scoped connections to Oracle and PostgreSQL.
/// Pools are built lazily on first use and torn down on `reconfigure`.
pub struct ConnectionProvider {
    settings: RwLock<ConnectionSettings>,
    oracle_pool: RwLock<Option<Arc<oracle::pool::Pool>>>,
    postgres_pool: RwLock<Option<PgPool>>,
}

impl ConnectionProvider {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(ConnectionSettings::default()),
            oracle_pool: RwLock::new(None),
            postgres_pool: RwLock::new(None),
        }
    }

    /// Replaces connection settings and drops any pools built under the old
    /// settings; the next `with_oracle`/`with_postgres` call rebuilds them.
    pub async fn reconfigure(&self, settings: ConnectionSettings) {
        *self.settings.write().await = settings;
        *self.oracle_pool.write().await = None;
        *self.postgres_pool.write().await = None;
    }

    async fn oracle_pool(&self) -> Result<Arc<oracle::pool::Pool>, DbError> {
        if let Some(pool) = self.oracle_pool.read().await.clone() {
            return Ok(pool);
        }
        let mut guard = self.oracle_pool.write().await;
        if let Some(pool) = guard.clone() {
            return Ok(pool);
        }

        let settings = self.settings.read().await.clone();
        let user = settings
            .oracle_user
            .ok_or_else(|| DbError::NotConfigured("oracle.user is not set".into()))?;
        let password = settings.oracle_password.unwrap_or_default();
        let connect_string = settings
            .oracle_connect_string
            .ok_or_else(|| DbError::NotConfigured("oracle.url is not set".into()))?;

        let pool = tokio::task::spawn_blocking(move || {
            oracle::pool::PoolBuilder::new(user, password, connect_string)
                .max_connections(5)
                .build()
        })
        .await??;

        let pool = Arc::new(pool);
        *guard = Some(pool.clone());
        Ok(pool)
    }

    async fn postgres_pool(&self) -> Result<PgPool, DbError> {
        if let Some(pool) = self.postgres_pool.read().await.clone() {
            return Ok(pool);
        }
        let mut guard = self.postgres_pool.write().await;
        if let Some(pool) = guard.clone() {
            return Ok(pool);
        }

        let url = self
            .settings
            .read()
            .await
            .postgre_url_or_err()?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&url)
            .await?;

        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Scoped acquisition of an Oracle connection. `f` runs on a blocking
    /// thread with autocommit left to the caller's statements; the
    /// connection returns to the pool when the blocking task exits, on
    /// every path (success, error, panic-unwind-free drop).
    pub async fn with_oracle<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&oracle::Connection) -> Result<T, oracle::Error> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.oracle_pool().await?;
        let result = tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await??;
        Ok(result)
    }

    /// Scoped acquisition of a PostgreSQL connection. Released back to the
    /// pool when the returned guard is dropped at the end of `f`.
    pub async fn with_postgres<F, Fut, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(sqlx::pool::PoolConnection<sqlx::Postgres>) -> Fut,
        Fut: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        let pool = self.postgres_pool().await?;
        let conn = pool.acquire().await?;
        let result = f(conn).await?;
        Ok(result)
    }

    pub async fn test_oracle(&self) -> ConnectionTestResult {
        let started = Instant::now();
        let outcome = self
            .with_oracle(|conn| {
                let (banner,): (String,) =
                    conn.query_row_as("SELECT banner FROM v$version WHERE rownum = 1", &[])?;
                Ok(banner)
            })
            .await;

        match outcome {
            Ok(banner) => ConnectionTestResult {
                connected: true,
                connection_time_ms: started.elapsed().as_millis() as u64,
                database_product_name: "Oracle".into(),
                database_product_version: banner,
                message: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "oracle connection test failed");
                ConnectionTestResult {
                    connected: false,
                    connection_time_ms: started.elapsed().as_millis() as u64,
                    database_product_name: "Oracle".into(),
                    database_product_version: String::new(),
                    message: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn test_postgres(&self) -> ConnectionTestResult {
        let started = Instant::now();
        let outcome = self
            .with_postgres(|mut conn| async move {
                let (version,): (String,) = sqlx::query_as("SELECT version()")
                    .fetch_one(&mut *conn)
                    .await?;
                Ok(version)
            })
            .await;

        match outcome {
            Ok(version) => ConnectionTestResult {
                connected: true,
                connection_time_ms: started.elapsed().as_millis() as u64,
                database_product_name: "PostgreSQL".into(),
                database_product_version: version,
                message: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "postgres connection test failed");
                ConnectionTestResult {
                    connected: false,
                    connection_time_ms: started.elapsed().as_millis() as u64,
                    database_product_name: "PostgreSQL".into(),
                    database_product_version: String::new(),
                    message: Some(err.to_string()),
                }
            }
        }
    }
}

impl Default for ConnectionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionSettings {
    fn postgre_url_or_err(&self) -> Result<String, DbError> {
        self.postgres_url
            .clone()
            .ok_or_else(|| DbError::NotConfigured("postgre.url is not set".into()))
    }
}
