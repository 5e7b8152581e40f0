//! Configuration loading for the Shiftboard API.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `SHIFTBOARD_`, producing a typed [`AppConfig`].

use std::{collections::BTreeMap, env, net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::billing::DEFAULT_PORTAL_URL;
use crate::repositories::{DEFAULT_AVATAR_BASE_URL, LatencyProfile, RepositoryConfig};

const ENV_PREFIX: &str = "SHIFTBOARD_";
const REDACTED: &str = "[REDACTED]";

/// Application configuration derived from `SHIFTBOARD_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Make repository calls sleep like a networked database would
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency: bool,
    /// Reject writes pointing at companies, job roles or employees that do not exist
    #[serde(default = "default_enforce_references")]
    pub enforce_references: bool,
    /// Employee the development session signs in as
    #[serde(default = "default_dev_user_id")]
    pub dev_user_id: i64,
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_publishable_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_publishable_key: Option<String>,
    #[serde(default = "default_billing_portal_url")]
    pub billing_portal_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_bind_addr: default_api_bind_addr(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            simulated_latency: default_simulated_latency(),
            enforce_references: default_enforce_references(),
            dev_user_id: default_dev_user_id(),
            avatar_base_url: default_avatar_base_url(),
            auth_publishable_key: None,
            billing_publishable_key: None,
            billing_portal_url: default_billing_portal_url(),
        }
    }
}

impl AppConfig {
    /// Returns the configured bind address as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.api_bind_addr.parse()
    }

    /// Returns the billing portal link as a parsed URL.
    pub fn billing_portal_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.billing_portal_url)
    }

    /// Settings handed to the record repository.
    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig {
            enforce_references: self.enforce_references,
            latency: if self.simulated_latency {
                LatencyProfile::enabled()
            } else {
                LatencyProfile::disabled()
            },
            avatar_base_url: self.avatar_base_url.clone(),
        }
    }

    /// Returns a redacted JSON representation (publishable keys are masked).
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut config = self.clone();
        if config.auth_publishable_key.is_some() {
            config.auth_publishable_key = Some(REDACTED.to_string());
        }
        if config.billing_publishable_key.is_some() {
            config.billing_publishable_key = Some(REDACTED.to_string());
        }
        serde_json::to_string_pretty(&config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(source) = self.bind_addr() {
            return Err(ConfigError::InvalidBindAddr {
                value: self.api_bind_addr.clone(),
                source,
            });
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat {
                value: self.log_format.clone(),
            });
        }

        if self.dev_user_id <= 0 {
            return Err(ConfigError::InvalidDevUserId {
                value: self.dev_user_id,
            });
        }

        for (key, value) in [
            ("AVATAR_BASE_URL", &self.avatar_base_url),
            ("BILLING_PORTAL_URL", &self.billing_portal_url),
        ] {
            if let Err(source) = Url::parse(value) {
                return Err(ConfigError::InvalidUrl {
                    key,
                    value: value.clone(),
                    source,
                });
            }
        }

        Ok(())
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_api_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_simulated_latency() -> bool {
    true
}

fn default_enforce_references() -> bool {
    true
}

fn default_dev_user_id() -> i64 {
    8
}

fn default_avatar_base_url() -> String {
    DEFAULT_AVATAR_BASE_URL.to_string()
}

fn default_billing_portal_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid api bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("log format must be 'json' or 'pretty', got '{value}'")]
    InvalidLogFormat { value: String },
    #[error("SHIFTBOARD_{key} must be a boolean, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
    #[error("SHIFTBOARD_{key} must be an integer, got '{value}'")]
    InvalidInteger { key: &'static str, value: String },
    #[error("dev user id must be positive, got {value}")]
    InvalidDevUserId { value: i64 },
    #[error("SHIFTBOARD_{key} is not a valid URL '{value}': {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        source: url::ParseError,
    },
}

/// Loads configuration using layered `.env` files and `SHIFTBOARD_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads and validates configuration. Later layers win: `.env`,
    /// `.env.local`, `.env.<profile>`, `.env.<profile>.local`, then the
    /// process environment.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let api_bind_addr = layered
            .remove("API_BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api_bind_addr);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_else(default_log_format);
        let simulated_latency = take_bool(&mut layered, "SIMULATED_LATENCY")?
            .unwrap_or_else(default_simulated_latency);
        let enforce_references = take_bool(&mut layered, "ENFORCE_REFERENCES")?
            .unwrap_or_else(default_enforce_references);
        let dev_user_id = match layered.remove("DEV_USER_ID").filter(|v| !v.is_empty()) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidInteger {
                    key: "DEV_USER_ID",
                    value,
                })?,
            None => default_dev_user_id(),
        };
        let avatar_base_url = layered
            .remove("AVATAR_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_avatar_base_url);
        let auth_publishable_key = layered
            .remove("AUTH_PUBLISHABLE_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let billing_publishable_key = layered
            .remove("BILLING_PUBLISHABLE_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let billing_portal_url = layered
            .remove("BILLING_PORTAL_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_billing_portal_url);

        let config = AppConfig {
            profile,
            api_bind_addr,
            log_level,
            log_format,
            simulated_latency,
            enforce_references,
            dev_user_id,
            avatar_base_url,
            auth_publishable_key,
            billing_publishable_key,
            billing_portal_url,
        };

        config.validate()?;
        Ok(config)
    }

    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var(format!("{ENV_PREFIX}PROFILE"))
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                        values.insert(stripped.to_string(), value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn take_bool(
    layered: &mut BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    let Some(value) = layered.remove(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { key, value }),
    }
}
