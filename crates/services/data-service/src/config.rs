//! Data service configuration.

use std::env;
use std::str::FromStr;

use common::{MongoConfig, PoolConfig, ServiceConfig, SqlServerConfig};

/// Data service configuration.
#[derive(Debug, Clone, Default)]
pub struct DataServiceConfig {
    pub service: ServiceConfig,
    pub sql: SqlServerConfig,
    pub mongo: MongoConfig,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn flag_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

impl DataServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let service_defaults = ServiceConfig::default();
        let sql_defaults = SqlServerConfig::default();
        let pool_defaults = PoolConfig::default();
        let mongo_defaults = MongoConfig::default();

        let service = ServiceConfig {
            log_level: env::var("LOG_LEVEL").unwrap_or(service_defaults.log_level),
            service_name: service_defaults.service_name,
        };

        let sql = SqlServerConfig {
            server: env::var("SQL_SERVER").unwrap_or(sql_defaults.server),
            port: var_or("SQL_PORT", sql_defaults.port),
            database: env::var("SQL_DATABASE").unwrap_or(sql_defaults.database),
            username: env::var("SQL_USERNAME").unwrap_or(sql_defaults.username),
            password: env::var("SQL_PASSWORD").unwrap_or(sql_defaults.password),
            trust_cert: flag_or("SQL_TRUST_CERT", sql_defaults.trust_cert),
            pool: PoolConfig {
                max_size: var_or("SQL_POOL_MAX_SIZE", pool_defaults.max_size),
                min_idle: var_or("SQL_POOL_MIN_IDLE", pool_defaults.min_idle),
                connection_timeout_secs: var_or(
                    "SQL_POOL_TIMEOUT_SECS",
                    pool_defaults.connection_timeout_secs,
                ),
                recycle_secs: var_or("SQL_POOL_RECYCLE_SECS", pool_defaults.recycle_secs),
            },
        };

        let mongo = MongoConfig {
            url: env::var("MONGO_URL").unwrap_or(mongo_defaults.url),
            database: env::var("MONGO_DATABASE").unwrap_or(mongo_defaults.database),
            min_pool_size: var_or("MONGO_MIN_POOL_SIZE", mongo_defaults.min_pool_size),
            max_pool_size: var_or("MONGO_MAX_POOL_SIZE", mongo_defaults.max_pool_size),
            max_idle_time_ms: var_or("MONGO_MAX_IDLE_TIME_MS", mongo_defaults.max_idle_time_ms),
            app_name: service.service_name.clone(),
        };

        Self {
            service,
            sql,
            mongo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_or_falls_back_on_garbage() {
        env::set_var("DATA_SERVICE_TEST_PORT", "not-a-port");
        assert_eq!(var_or("DATA_SERVICE_TEST_PORT", 1433u16), 1433);

        env::set_var("DATA_SERVICE_TEST_PORT", "14330");
        assert_eq!(var_or("DATA_SERVICE_TEST_PORT", 1433u16), 14330);
        env::remove_var("DATA_SERVICE_TEST_PORT");
    }

    #[test]
    fn test_flag_or() {
        assert!(flag_or("DATA_SERVICE_TEST_UNSET_FLAG", true));

        env::set_var("DATA_SERVICE_TEST_FLAG", "False");
        assert!(!flag_or("DATA_SERVICE_TEST_FLAG", true));

        env::set_var("DATA_SERVICE_TEST_FLAG", "YES");
        assert!(flag_or("DATA_SERVICE_TEST_FLAG", false));
        env::remove_var("DATA_SERVICE_TEST_FLAG");
    }
}
