//! Postgres ledger: campaigns, donations, withdrawals, roles and the
//! webhook journal, plus the pool they share.

pub mod campaign_repository;
pub mod donation_repository;
pub mod error;
pub mod ledger;
pub mod repository;
pub mod role_repository;
pub mod transaction;
pub mod webhook_repository;
pub mod withdrawal_repository;

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error as log_error, info, warn};

use self::error::{DatabaseError, DbResult};

/// Pool sizing for the ledger.
///
/// Settlement and withdrawal claims each hold a connection only for one
/// short statement or transaction, so a small pool goes a long way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection before failing
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_connections: config.max_connections,
            min_connections: defaults.min_connections.min(config.max_connections),
            ..defaults
        }
    }
}

/// Open the ledger pool and make sure the server answers
pub async fn connect(database_url: &str, config: &PoolConfig) -> DbResult<PgPool> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout = ?config.acquire_timeout,
        "Connecting to ledger database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .test_before_acquire(true)
        .connect(database_url)
        .await
        .map_err(|e| {
            log_error!(error = %e, "Ledger database unreachable");
            DatabaseError::from_sqlx(e).with_context("connect")
        })?;

    ping(&pool).await?;
    info!("Ledger database ready");
    Ok(pool)
}

/// Round-trip a trivial statement to prove the pool can serve queries
pub async fn ping(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Ledger ping failed");
        DatabaseError::from_sqlx(e).with_context("ping")
    })?;
    Ok(())
}
