use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Centralized connection pool manager for the bank database
pub struct DatabaseManager {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pool: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the shared database pool, creating it lazily on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        Self::instance().get_pool().await
    }

    async fn get_pool(&self) -> Result<PgPool, DatabaseError> {
        // Fast path: try read lock
        {
            let pool = self.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let connection_string = Self::build_connection_string()?;
        let config = crate::config::config();

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
            .connect(&connection_string)
            .await?;

        // Tables are created idempotently so a fresh database works out of the box
        Self::setup_schema(&pool).await?;

        {
            let mut slot = self.pool.write().await;
            *slot = Some(pool.clone());
        }

        info!("Created database pool");
        Ok(pool)
    }

    /// Build the connection string from DATABASE_URL, optionally swapping the
    /// database name in the URL path with EBANK_DB_NAME
    fn build_connection_string() -> Result<String, DatabaseError> {
        let base = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let mut url = url::Url::parse(&base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if let Ok(db_name) = std::env::var("EBANK_DB_NAME") {
            url.set_path(&format!("/{}", db_name));
        }
        Ok(url.to_string())
    }

    async fn setup_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Single table for both account variants, distinguished by account_type
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bank_accounts (
                id UUID PRIMARY KEY,
                account_type TEXT NOT NULL,
                balance DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                status TEXT NOT NULL,
                customer_id UUID NOT NULL REFERENCES customers(id),
                overdraft DOUBLE PRECISION,
                interest_rate DOUBLE PRECISION
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account_operations (
                id BIGSERIAL PRIMARY KEY,
                operation_date TIMESTAMPTZ NOT NULL,
                amount DOUBLE PRECISION NOT NULL,
                operation_type TEXT NOT NULL,
                description TEXT NOT NULL,
                account_id UUID NOT NULL REFERENCES bank_accounts(id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_account_operations_account_id \
             ON account_operations(account_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}
