//! Database layer - pool setup and repositories

pub mod domain;
pub mod findings;
pub mod traits;

pub use domain::PostgresDomainResolver;
pub use findings::{PostgresFindingStore, FINDINGS_TABLE};
pub use traits::{DomainResolver, FindingStore};

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;

pub async fn connect(config: &DatabaseConfig) -> crate::Result<PgPool> {
    let statement_timeout = format!("{}s", config.statement_timeout_seconds);
    let options = PgConnectOptions::from_str(&config.url)?
        .options([("statement_timeout", statement_timeout.as_str())]);

    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect_with(options)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| crate::Error::Internal(format!("migrations failed: {e}")))?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}
