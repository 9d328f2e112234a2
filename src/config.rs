//! Environment-selected configuration.
//!
//! The backend base address depends on whether the app runs as a development
//! or production build; everything else has a sensible default and can be
//! overridden through `GARMENT_*` variables or CLI flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use reqwest::Url;
use serde::Serialize;
use crate::utils::{ValuerError, ValuerResult};

pub const ENV_ENVIRONMENT: &str = "GARMENT_ENV";
pub const ENV_BACKEND_URL: &str = "GARMENT_BACKEND_URL";
pub const ENV_PRODUCTION_BACKEND_URL: &str = "GARMENT_PRODUCTION_BACKEND_URL";
pub const ENV_PROBE_TIMEOUT: &str = "GARMENT_PROBE_TIMEOUT_SECS";
pub const ENV_SUBMIT_TIMEOUT: &str = "GARMENT_SUBMIT_TIMEOUT_SECS";
pub const ENV_CAPTURE_DIR: &str = "GARMENT_CAPTURE_DIR";
pub const ENV_CAMERA_COMMAND: &str = "GARMENT_CAMERA_COMMAND";
pub const ENV_CAMERA_TIMEOUT: &str = "GARMENT_CAMERA_TIMEOUT_SECS";
pub const ENV_PLATFORM: &str = "GARMENT_PLATFORM";

pub const DEFAULT_DEVELOPMENT_URL: &str = "http://127.0.0.1:5050";
pub const DEFAULT_PRODUCTION_URL: &str = "https://your-production-backend.com";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CAMERA_COMMAND: &str = "fswebcam";
pub const DEFAULT_CAMERA_TIMEOUT: Duration = Duration::from_secs(20);

/// Which backend the app talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }
}

impl FromStr for Environment {
    type Err = ValuerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(ValuerError::config(format!("Unknown environment: {other}"))),
        }
    }
}

/// Validated http(s) base address without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendUrl(String);

impl BackendUrl {
    pub fn parse(raw: &str) -> ValuerResult<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| ValuerError::config(format!("Invalid backend URL '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValuerError::config(format!(
                "Backend URL must be http or https: {raw}"
            )));
        }
        if url.host_str().is_none() {
            return Err(ValuerError::config(format!("Backend URL has no host: {raw}")));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// `{base}{path}`; `path` starts with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub development_url: BackendUrl,
    pub production_url: BackendUrl,
    pub probe_timeout: Duration,
    pub submit_timeout: Duration,
    pub capture_dir: PathBuf,
    pub camera_command: String,
    pub camera_timeout: Duration,
    pub platform: String,
}

impl AppConfig {
    /// Defaults for the given environment.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            development_url: BackendUrl(DEFAULT_DEVELOPMENT_URL.to_string()),
            production_url: BackendUrl(DEFAULT_PRODUCTION_URL.to_string()),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            capture_dir: std::env::temp_dir().join("garment-valuer"),
            camera_command: DEFAULT_CAMERA_COMMAND.to_string(),
            camera_timeout: DEFAULT_CAMERA_TIMEOUT,
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> ValuerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ValuerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };
        let mut config = Self::new(environment);

        if let Some(raw) = lookup(ENV_BACKEND_URL) {
            config.development_url = BackendUrl::parse(&raw)?;
        }
        if let Some(raw) = lookup(ENV_PRODUCTION_BACKEND_URL) {
            config.production_url = BackendUrl::parse(&raw)?;
        }
        if let Some(raw) = lookup(ENV_PROBE_TIMEOUT) {
            config.probe_timeout = parse_secs(ENV_PROBE_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SUBMIT_TIMEOUT) {
            config.submit_timeout = parse_secs(ENV_SUBMIT_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CAPTURE_DIR) {
            config.capture_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_CAMERA_COMMAND) {
            config.camera_command = raw;
        }
        if let Some(raw) = lookup(ENV_CAMERA_TIMEOUT) {
            config.camera_timeout = parse_secs(ENV_CAMERA_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PLATFORM) {
            config.platform = raw;
        }

        Ok(config)
    }

    /// Base address for the active environment.
    pub fn backend_url(&self) -> &BackendUrl {
        match self.environment {
            Environment::Development => &self.development_url,
            Environment::Production => &self.production_url,
        }
    }

    /// Points the active environment at a different base address.
    pub fn set_backend_url(&mut self, url: BackendUrl) {
        match self.environment {
            Environment::Development => self.development_url = url,
            Environment::Production => self.production_url = url,
        }
    }
}

fn parse_secs(key: &str, raw: &str) -> ValuerResult<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ValuerError::config(format!("{key} must be a whole number of seconds, got '{raw}'")))?;
    if secs == 0 {
        return Err(ValuerError::config(format!("{key} cannot be 0")));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_selects_base_address() {
        let dev = AppConfig::from_lookup(lookup(&[
            (ENV_ENVIRONMENT, "development"),
            (ENV_BACKEND_URL, "http://192.168.1.153:5050/"),
        ]))
        .unwrap();
        assert_eq!(dev.backend_url().as_str(), "http://192.168.1.153:5050");
        assert_eq!(dev.backend_url().endpoint("/health"), "http://192.168.1.153:5050/health");

        let prod = AppConfig::from_lookup(lookup(&[
            (ENV_ENVIRONMENT, "prod"),
            (ENV_PRODUCTION_BACKEND_URL, "https://api.example.com"),
        ]))
        .unwrap();
        assert_eq!(prod.environment, Environment::Production);
        assert_eq!(prod.backend_url().as_str(), "https://api.example.com");
    }

    #[test]
    fn defaults_without_variables() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.submit_timeout, Duration::from_secs(30));
        assert_eq!(config.development_url.as_str(), DEFAULT_DEVELOPMENT_URL);
        assert_eq!(config.camera_timeout, Duration::from_secs(20));
    }

    #[test]
    fn camera_timeout_is_configurable() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_CAMERA_TIMEOUT, "3")])).unwrap();
        assert_eq!(config.camera_timeout, Duration::from_secs(3));
        assert!(AppConfig::from_lookup(lookup(&[(ENV_CAMERA_TIMEOUT, "0")])).is_err());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[(ENV_ENVIRONMENT, "staging")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_BACKEND_URL, "ftp://host")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_BACKEND_URL, "not a url")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_SUBMIT_TIMEOUT, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_PROBE_TIMEOUT, "five")])).is_err());
    }

    #[test]
    fn override_targets_active_environment() {
        let mut config = AppConfig::new(Environment::Production);
        config.set_backend_url(BackendUrl::parse("http://localhost:9000").unwrap());
        assert_eq!(config.production_url.as_str(), "http://localhost:9000");
        assert_eq!(config.development_url.as_str(), DEFAULT_DEVELOPMENT_URL);
    }
}
