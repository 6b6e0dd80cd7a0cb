use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryCommentRepository;
use crate::database::postgres::PgCommentRepository;
use crate::database::repository::SharedRepository;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_COMMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS comments (
        id     UUID PRIMARY KEY,
        text   TEXT NOT NULL CHECK (text <> ''),
        "user" UUID NOT NULL,
        date   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_COMMENTS_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS comments_date_idx ON comments (date DESC)";

/// Builds the connection pool and the repository the handlers are given
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a Postgres pool with the configured limits
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Create the comments table and its sort index if missing
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_COMMENTS_TABLE).execute(pool).await?;
        sqlx::query(CREATE_COMMENTS_DATE_INDEX).execute(pool).await?;
        info!("Comments schema is up to date");
        Ok(())
    }

    /// Pick the store for this process: Postgres when a URL is configured, memory otherwise
    pub async fn open_repository(config: &DatabaseConfig) -> Result<SharedRepository, DatabaseError> {
        if config.url.is_none() {
            warn!("DATABASE_URL not set; comments are kept in memory and lost on restart");
            return Ok(Arc::new(MemoryCommentRepository::new()));
        }

        let pool = Self::connect(config).await?;
        Self::migrate(&pool).await?;
        Ok(Arc::new(PgCommentRepository::new(pool)))
    }

    /// Close the pool on shutdown
    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
