use crate::config::DatabaseSettings;
use crate::infrastructure::log_messages;
use crate::{Error, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{info, instrument, warn};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized from settings
    #[instrument(skip(settings, url), fields(host = %settings.host))]
    pub async fn connect(settings: &DatabaseSettings, url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.into_inner())
            .connect(url)
            .await?;
        info!("{}", log_messages::database::CONNECTION_ESTABLISHED);
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the schema bootstrap migrations
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        info!("{}", log_messages::database::MIGRATION_STARTED);
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("{}", log_messages::database::MIGRATION_COMPLETED);
        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as health_check")
            .fetch_one(&self.pool)
            .await?;

        let health_check: i32 = row.try_get("health_check")?;

        if health_check == 1 {
            Ok(())
        } else {
            warn!("{}", log_messages::database::HEALTH_CHECK_FAILED);
            Err(Error::application(log_messages::database::HEALTH_CHECK_FAILED))
        }
    }
}
