//! Configuration Module
//!
//! Handles loading the cache configuration from environment variables and
//! parsing the store connection string.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Default expiration timeout in seconds (24h)
pub const DEFAULT_TIMEOUT_SECS: f64 = 86_400.0;

/// Default store connection string
pub const DEFAULT_CONNECTION: &str = "localhost:27017:cache:facts";

// == Connection Spec ==
/// Location of the backing document collection.
///
/// Parsed from a `host:port:dbName:collectionName` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
}

impl ConnectionSpec {
    /// Parses a `host:port:dbName:collectionName` connection string.
    ///
    /// Fails with [`CacheError::Config`] unless there are exactly four
    /// non-empty fields and the port is a valid number.
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.trim().split(':').collect();
        if fields.len() != 4 {
            return Err(CacheError::Config(format!(
                "connection '{}' must have 4 colon-separated fields \
                 (host:port:dbName:collectionName), found {}",
                raw,
                fields.len()
            )));
        }

        if let Some(pos) = fields.iter().position(|f| f.is_empty()) {
            return Err(CacheError::Config(format!(
                "connection '{}' has an empty field at position {}",
                raw,
                pos + 1
            )));
        }

        let port = fields[1].parse::<u16>().map_err(|_| {
            CacheError::Config(format!("connection '{}' has invalid port '{}'", raw, fields[1]))
        })?;

        Ok(Self {
            host: fields[0].to_string(),
            port,
            database: fields[2].to_string(),
            collection: fields[3].to_string(),
        })
    }

    /// Returns the `dbName.collectionName` namespace.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

impl FromStr for ConnectionSpec {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.host, self.port, self.database, self.collection
        )
    }
}

// == Config ==
/// Cache and server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing store location
    pub connection: ConnectionSpec,
    /// Expiration timeout in seconds, 0 disables expiry
    pub timeout: f64,
    /// Seconds allowed for reaching the store at startup
    pub store_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between background sweeps of expired records, 0 disables
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CONNECTION` - `host:port:dbName:collectionName` (default: localhost:27017:cache:facts)
    /// - `CACHE_TIMEOUT` - Expiration timeout in seconds (default: 86400)
    /// - `CACHE_STORE_TIMEOUT` - Store connection timeout in seconds (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    ///
    /// Unset variables take their default. A variable that is set but
    /// malformed fails with [`CacheError::Config`] so that a misconfigured
    /// cache never starts.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let connection = match lookup("CACHE_CONNECTION") {
            Some(raw) => ConnectionSpec::parse(&raw)?,
            None => defaults.connection,
        };

        let timeout = match lookup("CACHE_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.timeout,
        };

        Ok(Self {
            connection,
            timeout,
            store_timeout: parse_var(&lookup, "CACHE_STORE_TIMEOUT", defaults.store_timeout)?,
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            sweep_interval: parse_var(&lookup, "SWEEP_INTERVAL", defaults.sweep_interval)?,
        })
    }
}

/// Parses an optional variable, keeping `default` when it is unset.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::Config(format!("invalid {} '{}'", name, raw))),
        None => Ok(default),
    }
}

/// Parses a timeout in seconds, rejecting negative and non-finite values.
pub fn parse_timeout(raw: &str) -> Result<f64> {
    let timeout: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CacheError::Config(format!("invalid timeout '{}'", raw)))?;

    check_timeout(timeout)
}

/// Accepts a timeout only if it is finite and non-negative.
pub fn check_timeout(timeout: f64) -> Result<f64> {
    if !timeout.is_finite() || timeout < 0.0 {
        return Err(CacheError::Config(format!(
            "timeout must be a non-negative number of seconds, got '{}'",
            timeout
        )));
    }

    Ok(timeout)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: ConnectionSpec {
                host: "localhost".to_string(),
                port: 27017,
                database: "cache".to_string(),
                collection: "facts".to_string(),
            },
            timeout: DEFAULT_TIMEOUT_SECS,
            store_timeout: 5,
            server_port: 3000,
            sweep_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.connection.to_string(), DEFAULT_CONNECTION);
        assert_eq!(config.timeout, 86_400.0);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 60);
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_config_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.connection, Config::default().connection);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.store_timeout, 5);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 60);
    }

    #[test]
    fn test_config_lookup_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_CONNECTION", "db.local:27018:inventory:facts"),
            ("CACHE_TIMEOUT", "0"),
            ("CACHE_STORE_TIMEOUT", "2"),
            ("SERVER_PORT", " 8080 "),
            ("SWEEP_INTERVAL", "0"),
        ]))
        .unwrap();

        assert_eq!(config.connection.host, "db.local");
        assert_eq!(config.timeout, 0.0);
        assert_eq!(config.store_timeout, 2);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.sweep_interval, 0);
    }

    #[test]
    fn test_config_malformed_numbers_fail() {
        let cases = [
            ("SERVER_PORT", "http"),
            ("SERVER_PORT", "70000"),
            ("SWEEP_INTERVAL", "-5"),
            ("SWEEP_INTERVAL", "often"),
            ("CACHE_STORE_TIMEOUT", "1.5"),
            ("CACHE_TIMEOUT", "-1"),
        ];

        for (name, raw) in cases {
            let vars = [(name, raw)];
            let result = Config::from_lookup(lookup_from(&vars));
            assert!(matches!(result, Err(CacheError::Config(_))), "{name}={raw}");
        }
    }

    #[test]
    fn test_connection_spec_parse() {
        let spec = ConnectionSpec::parse("db.local:27018:inventory:facts").unwrap();
        assert_eq!(spec.host, "db.local");
        assert_eq!(spec.port, 27018);
        assert_eq!(spec.database, "inventory");
        assert_eq!(spec.collection, "facts");
        assert_eq!(spec.namespace(), "inventory.facts");
    }

    #[test]
    fn test_connection_spec_wrong_field_count() {
        for raw in ["localhost:27017:db", "a:1:b:c:d", ""] {
            let result = ConnectionSpec::parse(raw);
            assert!(matches!(result, Err(CacheError::Config(_))), "{raw}");
        }
    }

    #[test]
    fn test_connection_spec_empty_field() {
        let result: Result<ConnectionSpec> = "localhost:27017::facts".parse();
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_connection_spec_bad_port() {
        let result = ConnectionSpec::parse("localhost:mongo:db:facts");
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_check_timeout() {
        assert_eq!(check_timeout(30.0).unwrap(), 30.0);
        assert!(matches!(check_timeout(-0.5), Err(CacheError::Config(_))));
        assert!(matches!(check_timeout(f64::NAN), Err(CacheError::Config(_))));
        assert!(matches!(check_timeout(f64::INFINITY), Err(CacheError::Config(_))));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("0").unwrap(), 0.0);
        assert_eq!(parse_timeout(" 3600.5 ").unwrap(), 3600.5);
        assert!(matches!(parse_timeout("-1"), Err(CacheError::Config(_))));
        assert!(matches!(parse_timeout("soon"), Err(CacheError::Config(_))));
        assert!(matches!(parse_timeout("inf"), Err(CacheError::Config(_))));
    }
}
