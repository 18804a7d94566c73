use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Environment variable overriding `primary.api_key`
pub const PRIMARY_API_KEY_ENV: &str = "SKYCAST_PRIMARY_API_KEY";
/// Environment variable overriding `secondary.api_key`
pub const SECONDARY_API_KEY_ENV: &str = "SKYCAST_SECONDARY_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Agent platform used as the first recommendation tier
    #[serde(default)]
    pub primary: PrimaryProviderConfig,

    /// Text-generation endpoint used as the second tier and for briefings
    #[serde(default)]
    pub secondary: SecondaryProviderConfig,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryProviderConfig {
    /// Base URL of the agent platform API
    #[serde(default = "default_primary_base_url")]
    pub base_url: String,

    /// Sent as `x-api-key` on every request
    #[serde(default)]
    pub api_key: String,

    /// User identifier attached to chat requests
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Display name of the advisor agent created on first use
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
}

fn default_primary_base_url() -> String {
    "https://agent-prod.studio.lyzr.ai".to_string()
}

fn default_user_id() -> String {
    "skycast_user".to_string()
}

fn default_agent_name() -> String {
    "WeatherAgent".to_string()
}

impl Default for PrimaryProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_primary_base_url(),
            api_key: String::new(),
            user_id: default_user_id(),
            agent_name: default_agent_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryProviderConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_secondary_base_url")]
    pub base_url: String,

    /// Bearer token. Also handed to the primary provider as its LLM credential.
    #[serde(default)]
    pub api_key: String,

    /// Model name used in the `generateContent` path
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_secondary_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

impl Default for SecondaryProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_secondary_base_url(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// Check if a credential is usable (not empty, not a placeholder)
fn is_configured_key(key: &str) -> bool {
    !key.trim().is_empty() && !key.starts_with("YOUR_")
}

impl PrimaryProviderConfig {
    pub fn is_configured(&self) -> bool {
        is_configured_key(&self.api_key)
    }
}

impl SecondaryProviderConfig {
    pub fn is_configured(&self) -> bool {
        is_configured_key(&self.api_key)
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            primary: PrimaryProviderConfig::default(),
            secondary: SecondaryProviderConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist.
    /// Credentials from the environment take precedence over the file.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Io(e),
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration from the default location and validate it
    ///
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), AppError> {
        let config = Self::load()?;
        Ok(config.into_validated()?)
    }

    /// Validate, logging warnings. Fails with `ConfigError::Invalid` on errors.
    pub fn into_validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Replace credentials with values from the environment when set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(PRIMARY_API_KEY_ENV).filter(|k| !k.is_empty()) {
            tracing::debug!("Using primary API key from {}", PRIMARY_API_KEY_ENV);
            self.primary.api_key = key;
        }
        if let Some(key) = lookup(SECONDARY_API_KEY_ENV).filter(|k| !k.is_empty()) {
            tracing::debug!("Using secondary API key from {}", SECONDARY_API_KEY_ENV);
            self.secondary.api_key = key;
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.primary.base_url, "primary.base_url", &mut result);
        validate_url(&self.secondary.base_url, "secondary.base_url", &mut result);

        if self.primary.user_id.trim().is_empty() {
            result.add_error("primary.user_id", "User id must not be empty");
        }

        if self.secondary.model.trim().is_empty() {
            result.add_error("secondary.model", "Model name must not be empty");
        }

        if self.http.request_timeout_secs == 0 {
            result.add_error("http.request_timeout_secs", "Timeout must be greater than 0");
        }

        // Missing keys only disable a tier; the fallback text still works.
        if !self.primary.is_configured() {
            result.add_warning(
                "primary.api_key",
                format!("Primary provider not configured (set {})", PRIMARY_API_KEY_ENV),
            );
        }
        if !self.secondary.is_configured() {
            result.add_warning(
                "secondary.api_key",
                format!(
                    "Secondary provider not configured (set {})",
                    SECONDARY_API_KEY_ENV
                ),
            );
        }

        result
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
