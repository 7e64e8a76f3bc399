use sqlx::postgres::{PgPool, PgPoolOptions};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{PoolConfig, PostgresConfig};
use crate::error::DatabaseError;

/// Shared handle to the connection pool.
///
/// The pool connects lazily: building an engine never touches the network, so
/// an unreachable server is only reported when a session first needs a
/// connection. Clones share the same pool.
#[derive(Clone)]
pub struct Engine {
    pool: Arc<PgPool>,
    display_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PoolStatus {
    pub total_connections: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
}

impl Engine {
    /// Must be called from within a Tokio runtime; the pool spawns its
    /// maintenance task on construction.
    pub fn new(postgres: &PostgresConfig, pool: &PoolConfig) -> Result<Self, DatabaseError> {
        let options = postgres.connect_options()?;
        let display_url = postgres.display_url();

        let pool = PgPoolOptions::new()
            .max_connections(pool.max_connections)
            .min_connections(pool.min_connections)
            .acquire_timeout(Duration::from_secs(pool.acquire_timeout_secs))
            .connect_lazy_with(options);

        info!("Database engine created for {}", display_url);

        Ok(Self {
            pool: Arc::new(pool),
            display_url,
        })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    /// Connection URL with the password masked.
    pub fn url(&self) -> &str {
        &self.display_url
    }

    pub fn status(&self) -> PoolStatus {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        PoolStatus {
            total_connections: size,
            active_connections: size.saturating_sub(idle),
            idle_connections: idle,
        }
    }

    /// Round-trip a trivial query through the pool.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }

    /// Close every pooled connection. Sessions opened afterwards fail.
    pub async fn dispose(&self) {
        debug!("Disposing database engine for {}", self.display_url);
        self.pool.close().await;
    }

    pub fn is_disposed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Whether both handles refer to the same pool.
    pub fn same_as(&self, other: &Engine) -> bool {
        Arc::ptr_eq(&self.pool, &other.pool)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("url", &self.display_url)
            .field("status", &self.status())
            .finish()
    }
}
