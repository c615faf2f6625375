//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 480;
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 5;

/// Settings for one server process.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Connection pool size.
    pub database_max_connections: u32,
    /// External generation endpoint.
    pub generator_url: String,
    /// Deadline for one generation call.
    pub generator_timeout: Duration,
    /// Freshness window of the catalog cache.
    pub catalog_cache_ttl: Duration,
    /// OTLP collector endpoint; export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            present(key)
                .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: present("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_or(present("PORT"), "PORT", DEFAULT_PORT)?,
            database_max_connections: parse_or(
                present("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            generator_url: required("GENERATOR_URL")?,
            generator_timeout: Duration::from_secs(parse_or(
                present("GENERATOR_TIMEOUT_SECS"),
                "GENERATOR_TIMEOUT_SECS",
                DEFAULT_GENERATOR_TIMEOUT_SECS,
            )?),
            catalog_cache_ttl: Duration::from_secs(parse_or(
                present("CATALOG_CACHE_TTL_SECS"),
                "CATALOG_CACHE_TTL_SECS",
                DEFAULT_CATALOG_CACHE_TTL_SECS,
            )?),
            otlp_endpoint: present("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST` is not an IP address.
    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/storyloom"),
        ("GENERATOR_URL", "http://generator.internal/generate"),
    ];

    #[test]
    fn test_defaults_apply_when_optional_vars_are_unset() {
        let config = config_from(&REQUIRED).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.generator_timeout, Duration::from_secs(480));
        assert_eq!(config.catalog_cache_ttl, Duration::from_secs(5));
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_overrides_are_read() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("GENERATOR_TIMEOUT_SECS", "60"),
            ("CATALOG_CACHE_TTL_SECS", "30"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ]);

        let config = config_from(&pairs).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.generator_timeout, Duration::from_secs(60));
        assert_eq!(config.catalog_cache_ttl, Duration::from_secs(30));
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn test_missing_database_url_is_config_error() {
        let result = config_from(&[("GENERATOR_URL", "http://generator/generate")]);

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("DATABASE_URL")));
    }

    #[test]
    fn test_missing_generator_url_is_config_error() {
        let result = config_from(&[("DATABASE_URL", "postgres://localhost/storyloom")]);

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("GENERATOR_URL")));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));

        let result = config_from(&pairs);

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_bind_address_combines_host_and_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([("HOST", "127.0.0.1"), ("PORT", "4000")]);

        let addr = config_from(&pairs).unwrap().bind_address().unwrap();

        assert_eq!(addr, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
    }
}
