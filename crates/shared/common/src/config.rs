//! Shared configuration structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base service configuration shared by all services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and as the store client app name
    pub service_name: String,
    /// Log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "data-service".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Connection pool bounds for the relational store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    pub max_size: u32,
    pub min_idle: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout_secs: u64,
    /// Seconds before a connection is recycled
    pub recycle_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 30,
            min_idle: 10,
            connection_timeout_secs: 30,
            recycle_secs: 3600,
        }
    }
}

/// SQL Server configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct SqlServerConfig {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Accept the server certificate without validation
    pub trust_cert: bool,
    pub pool: PoolConfig,
}

impl Default for SqlServerConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 1433,
            database: "SkillSync".to_string(),
            username: "sa".to_string(),
            password: String::new(),
            trust_cert: true,
            pool: PoolConfig::default(),
        }
    }
}

impl fmt::Debug for SqlServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlServerConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("trust_cert", &self.trust_cert)
            .field("pool", &self.pool)
            .finish()
    }
}

/// MongoDB configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct MongoConfig {
    /// Connection string; may embed credentials
    #[serde(skip_serializing)]
    pub url: String,
    pub database: String,
    pub min_pool_size: u32,
    pub max_pool_size: u32,
    pub max_idle_time_ms: u64,
    pub app_name: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "skillsync".to_string(),
            min_pool_size: 5,
            max_pool_size: 50,
            max_idle_time_ms: 30_000,
            app_name: "data-service".to_string(),
        }
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("url", &"[REDACTED]")
            .field("database", &self.database)
            .field("min_pool_size", &self.min_pool_size)
            .field("max_pool_size", &self.max_pool_size)
            .field("max_idle_time_ms", &self.max_idle_time_ms)
            .field("app_name", &self.app_name)
            .finish()
    }
}
