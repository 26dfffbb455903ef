//! Load configuration from an env file plus the process environment.

use crate::config::types::{AppConfig, PostgresConfig, RestConfig};
use crate::error::ConfigError;
use sqlx::postgres::PgSslMode;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Variable naming the env file. Defaults to `.env` in the working directory.
pub const ENV_FILE_VAR: &str = "ENV_FILE";
const DEFAULT_ENV_FILE: &str = ".env";

impl AppConfig {
    /// Read the env file (if any) into the process environment, then build the config.
    /// Variables already set in the environment win over the file.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(ENV_FILE_VAR) {
            Ok(path) => {
                dotenvy::from_path(Path::new(&path)).map_err(|source| ConfigError::EnvFile { path, source })?;
            }
            Err(_) => match dotenvy::from_filename(DEFAULT_ENV_FILE) {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(source) => {
                    return Err(ConfigError::EnvFile {
                        path: DEFAULT_ENV_FILE.into(),
                        source,
                    })
                }
            },
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let rest = RestConfig {
            host: get("REST_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("REST_PORT", get("REST_PORT"), 8080)?,
        };

        let ssl_mode = match get("POSTGRES_SSLMODE") {
            Some(v) => PgSslMode::from_str(&v).map_err(|e| ConfigError::Invalid {
                key: "POSTGRES_SSLMODE",
                reason: e.to_string(),
            })?,
            None => PgSslMode::Disable,
        };
        let pool_max_conns: u32 = parse_or("POSTGRES_POOL_MAX_CONNS", get("POSTGRES_POOL_MAX_CONNS"), 10)?;
        if pool_max_conns == 0 {
            return Err(ConfigError::Invalid {
                key: "POSTGRES_POOL_MAX_CONNS",
                reason: "must be at least 1".into(),
            });
        }

        let postgres = PostgresConfig {
            host: required("POSTGRES_HOST")?,
            port: parse_or("POSTGRES_PORT", get("POSTGRES_PORT"), 5432)?,
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            database: required("POSTGRES_DB")?,
            ssl_mode,
            pool_max_conns,
            pool_max_conn_lifetime: duration_or(
                "POSTGRES_POOL_MAX_CONN_LIFETIME",
                get("POSTGRES_POOL_MAX_CONN_LIFETIME"),
                Duration::from_secs(3600),
            )?,
            pool_max_conn_idle_time: duration_or(
                "POSTGRES_POOL_MAX_CONN_IDLE_TIME",
                get("POSTGRES_POOL_MAX_CONN_IDLE_TIME"),
                Duration::from_secs(1800),
            )?,
        };

        Ok(AppConfig {
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            rest,
            postgres,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn duration_or(key: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    match raw {
        Some(v) => parse_duration(&v).ok_or_else(|| ConfigError::Invalid {
            key,
            reason: format!("invalid duration '{}'", v),
        }),
        None => Ok(default),
    }
}

/// Parse `500ms`, `30s`, `5m`, `1h`, or a bare number of seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    let n: u64 = digits.parse().ok()?;
    match unit {
        "" | "s" => Some(Duration::from_secs(n)),
        "ms" => Some(Duration::from_millis(n)),
        "m" => n.checked_mul(60).map(Duration::from_secs),
        "h" => n.checked_mul(3600).map(Duration::from_secs),
        _ => None,
    }
}
