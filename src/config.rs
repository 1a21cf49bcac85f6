//! Configuration Management
//!
//! Connection settings for the affiliation service, loaded from a JSON or
//! YAML file and overridable from the environment.

use crate::error::{ConnectorError, ConnectorResult};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the service address
pub const ENV_SERVICE_ADDRESS: &str = "EDUID_SERVICE_ADDRESS";
/// Environment variable overriding the username
pub const ENV_USERNAME: &str = "EDUID_USERNAME";
/// Environment variable overriding the password
pub const ENV_PASSWORD: &str = "EDUID_PASSWORD";

/// How requests authenticate against the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Basic,
    None,
}

/// Connector configuration
#[derive(Deserialize)]
pub struct ConnectorConfig {
    /// Base URL of the SCIM API, e.g. `https://eduid.example.org/scim/v1`
    pub service_address: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub auth_method: AuthMethod,
    /// Accept any server certificate
    #[serde(default)]
    pub trust_all_certificates: bool,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl ConnectorConfig {
    pub fn new(service_address: impl Into<String>) -> Self {
        Self {
            service_address: service_address.into(),
            username: None,
            password: None,
            auth_method: AuthMethod::Basic,
            trust_all_certificates: false,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_method = AuthMethod::Basic;
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    pub fn with_trust_all_certificates(mut self, trust: bool) -> Self {
        self.trust_all_certificates = trust;
        self
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("eduid-connector").join("config.json"))
    }

    /// Parse a config file, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {}", path.display()))
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config {}", path.display()))
        }
    }

    /// Load configuration (explicit path > default path), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::new(""),
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Override fields from `EDUID_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(address) = std::env::var(ENV_SERVICE_ADDRESS) {
            self.service_address = address;
        }
        if let Ok(username) = std::env::var(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.password = Some(SecretString::from(password));
        }
    }

    /// Check that the configuration can be used to build a connector
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.service_address.trim().is_empty() {
            return Err(ConnectorError::InvalidConfiguration(
                "service address is not set".to_string(),
            ));
        }

        let url = url::Url::parse(&self.service_address).map_err(|e| {
            ConnectorError::InvalidConfiguration(format!(
                "service address '{}' is not a valid URL: {}",
                self.service_address, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConnectorError::InvalidConfiguration(format!(
                "service address must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.auth_method == AuthMethod::Basic
            && self.password.is_some()
            && self.username.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConnectorError::InvalidConfiguration(
                "basic authentication requires a username".to_string(),
            ));
        }

        Ok(())
    }

    /// Service address without trailing slashes
    pub fn base_url(&self) -> &str {
        self.service_address.trim_end_matches('/')
    }

    /// Join a relative path onto the service address
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// Whether requests carry an Authorization header
    pub fn sends_basic_auth(&self) -> bool {
        self.auth_method == AuthMethod::Basic && self.password.is_some()
    }
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("service_address", &self.service_address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("auth_method", &self.auth_method)
            .field("trust_all_certificates", &self.trust_all_certificates)
            .finish()
    }
}

impl fmt::Display for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConnectorConfig{{service_address={}, username={}, auth_method={:?}, trust_all_certificates={}}}",
            self.service_address,
            self.username.as_deref().unwrap_or("-"),
            self.auth_method,
            self.trust_all_certificates
        )
    }
}
