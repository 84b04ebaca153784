//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATA_SERVICE_URL` - Base URL of the shop data service
//!
//! ## Optional
//! - `API_KEY` - Bearer token sent to the data service
//! - `PARTNER_SHOPS_HOST` - Bind address (default: 0.0.0.0)
//! - `PARTNER_SHOPS_PORT` - Listen port (default: 3000)
//! - `ADMIN_ENABLED` - Mount the admin routes (default: false)
//! - `SHOPS_CACHE_TTL_SECS` - Shop list cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Keys whose bits-per-character fall below this are rejected.
const MIN_KEY_ENTROPY: f64 = 3.0;

/// Fragments that mark a copied-from-docs API key.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "changeme",
    "placeholder",
    "example",
    "your-",
    "your_",
    "xxx",
    "todo",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingEnvVar(String),
    #[error("{0} is invalid: {1}")]
    InvalidEnvVar(String, String),
    #[error("{0} was rejected: {1}")]
    InsecureSecret(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Whether the admin routes (delete affordances) are mounted
    pub admin_enabled: bool,
    /// Shop data service configuration
    pub data_service: DataServiceConfig,
    /// Sentry DSN; Sentry stays off when unset
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Shop data service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct DataServiceConfig {
    /// Base URL, e.g. `https://data.example.net/api`
    pub base_url: Url,
    /// Bearer token for the data service
    pub api_key: Option<SecretString>,
    /// Lifetime of the cached shop list
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for DataServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataServiceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl WebConfig {
    /// Read the process environment, after loading `.env` when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a missing or malformed variable, or an API
    /// key that looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`WebConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            host: vars.parse_or("PARTNER_SHOPS_HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: vars.parse_or("PARTNER_SHOPS_PORT", 3000)?,
            admin_enabled: vars.flag("ADMIN_ENABLED")?,
            data_service: DataServiceConfig::from_vars(&vars)?,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: vars.parse_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: vars.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DataServiceConfig {
    /// Load the data service section from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATA_SERVICE_URL` is missing or not an
    /// http(s) URL, or if `API_KEY` looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&Vars(|key: &str| std::env::var(key).ok()))
    }

    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_service_url(&vars.required("DATA_SERVICE_URL")?)
            .map_err(|reason| ConfigError::InvalidEnvVar("DATA_SERVICE_URL".to_string(), reason))?;

        let api_key = vars
            .optional("API_KEY")
            .map(|key| {
                check_api_key(&key)
                    .map(|()| SecretString::from(key))
                    .map_err(|reason| ConfigError::InsecureSecret("API_KEY".to_string(), reason))
            })
            .transpose()?;

        Ok(Self {
            base_url,
            api_key,
            cache_ttl: Duration::from_secs(
                vars.parse_or("SHOPS_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            ),
        })
    }

    /// Configuration pointing at `base_url` with no API key and the default TTL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// Variable source with blank values treated as unset.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// `true/false`, `1/0`, `yes/no`, `on/off`. Unset is `false`.
    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(false);
        };
        match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{other}'"),
            )),
        }
    }
}

fn parse_service_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Bits of Shannon entropy per character.
fn entropy_per_char(s: &str) -> f64 {
    let counts = s.chars().fold(BTreeMap::<char, u32>::new(), |mut acc, c| {
        *acc.entry(c).or_default() += 1;
        acc
    });
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / f64::from(total);
            -p * p.log2()
        })
        .sum()
}

/// Reject keys that are obviously placeholders or too repetitive to be real.
fn check_api_key(key: &str) -> Result<(), String> {
    let lower = key.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lower.contains(*f)) {
        return Err(format!("looks like a placeholder (contains '{fragment}')"));
    }

    let entropy = entropy_per_char(key);
    if entropy < MIN_KEY_ENTROPY {
        return Err(format!(
            "too predictable ({entropy:.2} bits/char, minimum {MIN_KEY_ENTROPY})"
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATA_SERVICE_URL", "https://data.test/api")]).unwrap();

        assert_eq!(config.port, 3000);
        assert!(!config.admin_enabled);
        assert!(config.data_service.api_key.is_none());
        assert_eq!(config.data_service.cache_ttl, Duration::from_secs(300));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATA_SERVICE_URL", "http://localhost:8080/api"),
            ("PARTNER_SHOPS_PORT", "8081"),
            ("ADMIN_ENABLED", " Yes "),
            ("SHOPS_CACHE_TTL_SECS", "30"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.port, 8081);
        assert!(config.admin_enabled);
        assert_eq!(config.data_service.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_missing_or_blank_service_url() {
        assert!(matches!(config_from(&[]), Err(ConfigError::MissingEnvVar(_))));
        assert!(matches!(
            config_from(&[("DATA_SERVICE_URL", "   ")]),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_service_url() {
        assert!(matches!(
            config_from(&[("DATA_SERVICE_URL", "ftp://data.test")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_invalid_flag_and_port() {
        let url = ("DATA_SERVICE_URL", "https://data.test");
        assert!(matches!(
            config_from(&[url, ("ADMIN_ENABLED", "maybe")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            config_from(&[url, ("PARTNER_SHOPS_PORT", "70000")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_api_key_checks() {
        let url = ("DATA_SERVICE_URL", "https://data.test");
        for weak in ["changeme-please", "your_api_key", "aaaaaaaaaaaaaaaaaaaa"] {
            assert!(
                matches!(
                    config_from(&[url, ("API_KEY", weak)]),
                    Err(ConfigError::InsecureSecret(_, _))
                ),
                "{weak} accepted"
            );
        }

        let config = config_from(&[url, ("API_KEY", "k7Qz2mWv9LpR4tXc8NbY")]).unwrap();
        assert!(config.data_service.api_key.is_some());
    }

    #[test]
    fn test_api_key_may_contain_secret() {
        let url = ("DATA_SERVICE_URL", "https://data.test");
        for key in ["sk_secret_7Qz2mWv9LpR4tXc8NbY", "SECRET-k7Qz2mWv9LpR4"] {
            let config = config_from(&[url, ("API_KEY", key)]).unwrap();
            assert!(config.data_service.api_key.is_some(), "{key} rejected");
        }
    }

    #[test]
    fn test_entropy_per_char() {
        assert!(entropy_per_char("").abs() < f64::EPSILON);
        assert!((entropy_per_char("abab") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_socket_addr() {
        let config = WebConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            admin_enabled: false,
            data_service: DataServiceConfig::new(Url::parse("http://localhost:8080").unwrap()),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_data_service_config_debug_redacts_api_key() {
        let mut config = DataServiceConfig::new(Url::parse("https://data.test/api").unwrap());
        config.api_key = Some(SecretString::from("super_secret_api_key_value"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://data.test/api"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key_value"));
    }
}
