//! Typed application configuration.

use sqlx::postgres::PgSslMode;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tracing filter directive, e.g. `info` or `qna_service=debug,sqlx=warn`.
    pub log_level: String,
    pub rest: RestConfig,
    pub postgres: PostgresConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub host: String,
    pub port: u16,
}

impl RestConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,
    pub pool_max_conns: u32,
    pub pool_max_conn_lifetime: Duration,
    pub pool_max_conn_idle_time: Duration,
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_max_conns", &self.pool_max_conns)
            .field("pool_max_conn_lifetime", &self.pool_max_conn_lifetime)
            .field("pool_max_conn_idle_time", &self.pool_max_conn_idle_time)
            .finish()
    }
}
