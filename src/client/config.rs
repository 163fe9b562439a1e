//! Module providing client configuration, with defaults overridable from the environment.

use super::consumer::DEFAULT_MAX_BYTES;
use std::{env, fmt::Display, str::FromStr, time::Duration};

pub const DEFAULT_BROKER_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const BROKER_URL_VAR: &str = "TAILMQ_BROKER_URL";
pub const MAX_BYTES_VAR: &str = "TAILMQ_MAX_BYTES";
pub const REQUEST_TIMEOUT_MS_VAR: &str = "TAILMQ_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the broker, e.g. `http://localhost:5000`.
    pub broker_url: String,

    /// Upper bound on the bytes requested per fetch.
    pub max_bytes: u64,

    /// Bound on a whole request/response exchange, body included.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            broker_url: DEFAULT_BROKER_URL.into(),
            max_bytes: DEFAULT_MAX_BYTES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value {:?} for {}.", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parses `value` when present, falling back to `default` when absent.
pub fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

/// Reads and parses the environment variable `key`, falling back to `default` when unset.
pub fn var_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    parse_or(key, env::var(key).ok(), default)
}

impl ClientConfig {
    /// Loads a configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads a configuration using `lookup` to resolve variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            broker_url: lookup(BROKER_URL_VAR).unwrap_or(defaults.broker_url),
            max_bytes: parse_or(MAX_BYTES_VAR, lookup(MAX_BYTES_VAR), defaults.max_bytes)?,
            request_timeout: parse_or(
                REQUEST_TIMEOUT_MS_VAR,
                lookup(REQUEST_TIMEOUT_MS_VAR),
                defaults.request_timeout.as_millis() as u64,
            )
            .map(Duration::from_millis)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ClientConfig, ConfigError, BROKER_URL_VAR, DEFAULT_BROKER_URL, MAX_BYTES_VAR,
        REQUEST_TIMEOUT_MS_VAR,
    };
    use std::{collections::HashMap, time::Duration};

    fn lookup<'a>(
        vars: &'a HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|value| value.to_string())
    }

    #[test]
    fn test_defaults_when_unset() {
        let vars = HashMap::new();

        let config = ClientConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.broker_url, DEFAULT_BROKER_URL);
        assert_eq!(config.max_bytes, 4096);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars = HashMap::from([
            (BROKER_URL_VAR, "http://broker:9000"),
            (MAX_BYTES_VAR, " 1024 "),
            (REQUEST_TIMEOUT_MS_VAR, "250"),
        ]);

        let config = ClientConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(
            config,
            ClientConfig {
                broker_url: "http://broker:9000".into(),
                max_bytes: 1024,
                request_timeout: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        let vars = HashMap::from([(MAX_BYTES_VAR, "lots")]);

        assert_eq!(
            ClientConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidValue {
                key: MAX_BYTES_VAR,
                value: "lots".into()
            })
        );
    }
}
