// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders
//! 3. Parse YAML, TOML or JSON into [`GuardConfig`]
//! 4. Apply environment variable overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! SPAGATE_SIGN_IN_ROUTE=/owner/login
//! SPAGATE_TOKEN_KEY=access_token
//! SPAGATE_PROFILE_KEY=bbh_user_profile
//! SPAGATE_NOTICES_ENABLED=false
//! SPAGATE_LOG_LEVEL=debug
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{GuardConfig, LogLevel};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use spagate_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("spagate.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables in values.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a loader with the `SPAGATE` prefix.
    pub fn new() -> Self {
        Self {
            env_prefix: "SPAGATE".to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution and overrides.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format follows the extension: `.yaml`/`.yml`, `.toml` or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<GuardConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let format = ConfigFormat::from_path(path)?;

        let content = self.prepare(&content);
        let mut config: GuardConfig = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        self.finish(&mut config)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<GuardConfig> {
        let content = self.prepare(content);
        let mut config: GuardConfig = parse_str(&content, format)?;
        self.finish(&mut config)?;
        Ok(config)
    }

    /// Builds the default configuration with environment overrides applied.
    pub fn load_defaults(&self) -> ConfigResult<GuardConfig> {
        let mut config = GuardConfig::default();
        self.finish(&mut config)?;
        Ok(config)
    }

    fn prepare(&self, content: &str) -> String {
        if self.resolve_env_vars {
            resolve_env_placeholders(content)
        } else {
            content.to_string()
        }
    }

    fn finish(&self, config: &mut GuardConfig) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(config)?;
        }
        config.validate()?;
        debug!(
            sign_in = %config.routes.sign_in,
            notices = config.notices.enabled,
            "Guard configuration ready"
        );
        Ok(())
    }

    fn var(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = env::var(&name).ok();
        (name, value)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut GuardConfig) -> ConfigResult<()> {
        if let (_, Some(value)) = self.var("SIGN_IN_ROUTE") {
            config.routes.sign_in = value;
        }
        if let (_, Some(value)) = self.var("TOKEN_KEY") {
            config.storage.token_key = value;
        }
        if let (_, Some(value)) = self.var("PROFILE_KEY") {
            config.storage.profile_key = value;
        }
        if let (name, Some(value)) = self.var("NOTICES_ENABLED") {
            config.notices.enabled = parse_bool(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(name, "expected a boolean"))?;
        }
        if let (name, Some(value)) = self.var("LOG_LEVEL") {
            config.logging.level = LogLevel::parse(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(name, "expected trace, debug, info, warn or error"))?;
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<GuardConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML goes through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

/// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
///
/// Unknown variables without a default are left in place.
fn resolve_env_placeholders(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (env::var(var_name), default_value) {
            (Ok(value), _) => result.push_str(&value),
            (Err(_), Some(default)) => result.push_str(default),
            (Err(_), None) => {
                warn!("Environment variable '{}' not found", var_name);
                result.push_str(&format!("${{{}}}", var_name));
            }
        }
    }

    result
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Some(true),
        "false" | "0" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<GuardConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<GuardConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn isolated() -> ConfigLoader {
        ConfigLoader::new().with_env_prefix("SPAGATE_LOADER_TEST_UNSET")
    }

    const YAML: &str = r#"
routes:
  sign_in: /owner/login
  owner_home: /owner
notices:
  enabled: false
gate:
  require_auth_everywhere: true
logging:
  level: debug
"#;

    #[test]
    fn test_load_yaml() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = isolated().load(file.path()).unwrap();
        assert_eq!(config.routes.sign_in, "/owner/login");
        assert_eq!(config.routes.admin_home, "/admin");
        assert!(!config.notices.enabled);
        assert!(config.gate.require_auth_everywhere);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_load_toml() {
        let content = r#"
[storage]
token_key = "token"
profile_key = "user"

[notices]
session_expired = "Signed out after inactivity."
"#;
        let config = isolated().load_from_str(content, ConfigFormat::Toml).unwrap();
        assert_eq!(config.storage.token_key, "token");
        assert_eq!(config.notices.session_expired, "Signed out after inactivity.");
        assert!(config.notices.enabled);
    }

    #[test]
    fn test_load_json() {
        let content = r#"{"routes": {"customer_home": "/c"}}"#;
        let config = isolated().load_from_str(content, ConfigFormat::Json).unwrap();
        assert_eq!(config.routes.customer_home, "/c");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let content = r#"{"routes": {"sign_in": "login"}}"#;
        let err = isolated().load_from_str(content, ConfigFormat::Json).unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_missing_file() {
        let err = isolated().load("/nonexistent/spagate.yaml").unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigFormat::from_path(Path::new("guard.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_placeholders() {
        std::env::set_var("SPAGATE_PLACEHOLDER_TEST_HOME", "/team");
        let resolved = resolve_env_placeholders(
            "a: ${SPAGATE_PLACEHOLDER_TEST_HOME}\nb: ${SPAGATE_PLACEHOLDER_TEST_MISSING:/fallback}\nc: ${SPAGATE_PLACEHOLDER_TEST_MISSING}",
        );

        assert!(resolved.contains("a: /team"));
        assert!(resolved.contains("b: /fallback"));
        assert!(resolved.contains("c: ${SPAGATE_PLACEHOLDER_TEST_MISSING}"));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("SPAGATE_OVERRIDE_TEST_SIGN_IN_ROUTE", "/admin/login");
        std::env::set_var("SPAGATE_OVERRIDE_TEST_NOTICES_ENABLED", "off");

        let config = ConfigLoader::new()
            .with_env_prefix("SPAGATE_OVERRIDE_TEST")
            .load_from_str("{}", ConfigFormat::Json)
            .unwrap();

        assert_eq!(config.routes.sign_in, "/admin/login");
        assert!(!config.notices.enabled);
    }

    #[test]
    fn test_invalid_env_override() {
        std::env::set_var("SPAGATE_BAD_ENV_TEST_LOG_LEVEL", "loud");

        let err = ConfigLoader::new()
            .with_env_prefix("SPAGATE_BAD_ENV_TEST")
            .load_from_str("{}", ConfigFormat::Json)
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }
}
