//! Pool provisioning.

use std::time::Duration;

use sqlx::Connection;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{BenchError, BenchResult};
use crate::pool::MySqlTarget;

/// Maximum lifetime of any pooled connection.
pub const MAX_CONN_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Open a pool for `config` and verify the database answers.
///
/// Opening and the ping share one deadline of `config.ping_timeout`. On
/// success the pool is ready for up to `config.pool_size` concurrent
/// operations.
///
/// # Example
///
/// ```rust,ignore
/// let target = poolbench::provision::open_pool(&Config::from_env()).await?;
/// ```
pub async fn open_pool(config: &Config) -> BenchResult<MySqlTarget> {
    let target = config.dsn();
    debug!(
        pool_size = config.pool_size,
        timeout_secs = config.ping_timeout.as_secs(),
        "Opening pool for {}",
        target
    );

    let pool = pool_options(config).connect_lazy_with(config.connect_options());

    match tokio::time::timeout(config.ping_timeout, ping(&pool)).await {
        Ok(Ok(())) => {
            info!("Database connected successfully");
            Ok(MySqlTarget::new(pool, &config.table))
        }
        Ok(Err(source)) => {
            pool.close().await;
            Err(BenchError::Probe { target, source })
        }
        Err(_) => {
            pool.close().await;
            Err(BenchError::ProbeTimeout {
                target,
                timeout: config.ping_timeout,
            })
        }
    }
}

/// Pool limits for `config`: at most `pool_size` open connections, each
/// recycled after [`MAX_CONN_LIFETIME`].
pub fn pool_options(config: &Config) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.pool_size)
        .max_lifetime(MAX_CONN_LIFETIME)
        .acquire_timeout(config.ping_timeout)
}

async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}
