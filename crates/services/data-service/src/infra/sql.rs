//! SQL Server connection pool.

use std::time::Duration;

use bb8::{Pool, PooledConnection};
use bb8_tiberius::ConnectionManager;
use tiberius::{AuthMethod, Config};

use common::{AppError, AppResult, SqlServerConfig};

pub type SqlPool = Pool<ConnectionManager>;
pub type SqlConnection<'a> = PooledConnection<'a, ConnectionManager>;

/// Pooled SQL Server access shared by the relational repositories.
#[derive(Clone)]
pub struct SqlServer {
    pool: SqlPool,
}

impl SqlServer {
    /// Build the pool and verify connectivity with `SELECT 1`.
    pub async fn connect(config: &SqlServerConfig) -> AppResult<Self> {
        let manager = ConnectionManager::new(tiberius_config(config));

        let pool = Pool::builder()
            .max_size(config.pool.max_size)
            .min_idle(Some(config.pool.min_idle))
            .connection_timeout(Duration::from_secs(config.pool.connection_timeout_secs))
            .max_lifetime(Some(Duration::from_secs(config.pool.recycle_secs)))
            .build(manager)
            .await
            .map_err(|e| AppError::pool(e.to_string()))?;

        let server = Self { pool };
        server.ping().await?;
        tracing::info!(
            server = %config.server,
            database = %config.database,
            "Connected to SQL Server"
        );

        Ok(server)
    }

    /// Check out one pooled connection.
    pub async fn connection(&self) -> AppResult<SqlConnection<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| AppError::pool(e.to_string()))
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }
}

fn tiberius_config(settings: &SqlServerConfig) -> Config {
    let mut config = Config::new();
    config.host(&settings.server);
    config.port(settings.port);
    config.database(&settings.database);
    config.authentication(AuthMethod::sql_server(&settings.username, &settings.password));
    if settings.trust_cert {
        config.trust_cert();
    }
    config
}
