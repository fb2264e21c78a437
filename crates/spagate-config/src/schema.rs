// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! Every section has defaults matching the production client, so an empty
//! file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use spagate_core::{Notice, Role, RouteTable, StorageKeys};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// GuardConfig
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Sign-in and role home routes.
    pub routes: RouteTable,
    /// Session storage keys and gate cookie names.
    pub storage: StorageConfig,
    /// User-facing notices.
    pub notices: NoticeConfig,
    /// Server-side route gate.
    pub gate: GateConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl GuardConfig {
    /// Validates every section.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_routes(&self.routes)?;
        self.storage.validate()?;
        self.gate.validate(&self.routes)?;
        Ok(())
    }
}

fn validate_route(field: &str, route: &str) -> ConfigResult<()> {
    if !route.starts_with('/') {
        return Err(ConfigError::validation(field, format!("route '{}' must start with '/'", route)));
    }
    Ok(())
}

fn validate_routes(routes: &RouteTable) -> ConfigResult<()> {
    validate_route("routes.sign_in", &routes.sign_in)?;
    validate_route("routes.customer_home", &routes.customer_home)?;
    validate_route("routes.owner_home", &routes.owner_home)?;
    validate_route("routes.admin_home", &routes.admin_home)?;

    for (i, a) in Role::ALL.iter().enumerate() {
        for b in &Role::ALL[i + 1..] {
            if routes.home_for(*a) == routes.home_for(*b) {
                return Err(ConfigError::validation(
                    "routes",
                    format!("{} and {} share the home route '{}'", a, b, routes.home_for(*a)),
                ));
            }
        }
        if routes.home_for(*a) == routes.sign_in {
            return Err(ConfigError::validation(
                "routes.sign_in",
                format!("sign-in route collides with the {} home", a),
            ));
        }
    }
    Ok(())
}

// =============================================================================
// StorageConfig
// =============================================================================

/// Where session state lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Client storage key of the bearer token.
    pub token_key: String,
    /// Client storage key of the cached profile.
    pub profile_key: String,
    /// Cookie names read by the route gate.
    pub cookies: CookieNames,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let keys = StorageKeys::default();
        Self {
            token_key: keys.token,
            profile_key: keys.profile,
            cookies: CookieNames::default(),
        }
    }
}

impl StorageConfig {
    /// Returns the session store keys.
    pub fn keys(&self) -> StorageKeys {
        StorageKeys {
            token: self.token_key.clone(),
            profile: self.profile_key.clone(),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.token_key.trim().is_empty() {
            return Err(ConfigError::validation("storage.token_key", "must not be empty"));
        }
        if self.profile_key.trim().is_empty() {
            return Err(ConfigError::validation("storage.profile_key", "must not be empty"));
        }
        if self.token_key == self.profile_key {
            return Err(ConfigError::validation(
                "storage.profile_key",
                "must differ from storage.token_key",
            ));
        }
        if self.cookies.token.trim().is_empty() || self.cookies.role.trim().is_empty() {
            return Err(ConfigError::validation("storage.cookies", "cookie names must not be empty"));
        }
        Ok(())
    }
}

/// Cookie names set at sign-in and read by the route gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieNames {
    /// Bearer token cookie.
    pub token: String,
    /// Role cookie.
    pub role: String,
    /// Serialised user cookie.
    pub user: String,
}

impl Default for CookieNames {
    fn default() -> Self {
        Self {
            token: "token".to_string(),
            role: "role".to_string(),
            user: "user".to_string(),
        }
    }
}

// =============================================================================
// NoticeConfig
// =============================================================================

/// Texts of the toast-style notices shown by the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Global switch; `false` silences every guard.
    pub enabled: bool,
    /// Shown when no token is stored.
    pub sign_in_required: String,
    /// Shown when the token cannot be used.
    pub session_invalid: String,
    /// Shown when the token expired.
    pub session_expired: String,
    /// Shown when the role may not open the page.
    pub not_authorised: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sign_in_required: "Please sign in to continue.".to_string(),
            session_invalid: "Your session is no longer valid. Please sign in again.".to_string(),
            session_expired: "Your session has expired. Please sign in again.".to_string(),
            not_authorised: "You are not authorised to access this area.".to_string(),
        }
    }
}

impl NoticeConfig {
    /// Returns the text for a notice.
    pub fn message(&self, notice: Notice) -> &str {
        match notice {
            Notice::SignInRequired => &self.sign_in_required,
            Notice::SessionInvalid => &self.session_invalid,
            Notice::SessionExpired => &self.session_expired,
            Notice::NotAuthorised => &self.not_authorised,
        }
    }
}

// =============================================================================
// GateConfig
// =============================================================================

/// Server-side route gate run before a page is served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Sign-in page anonymous visitors are sent to.
    pub sign_in_page: String,
    /// Pages a signed-in visitor is bounced away from.
    pub auth_pages: Vec<String>,
    /// Pages open to everyone.
    pub public_paths: Vec<String>,
    /// Prefixes the gate never inspects (assets, API).
    pub excluded_prefixes: Vec<String>,
    /// Require a token on every non-public page, not only in role areas.
    pub require_auth_everywhere: bool,
    /// Query parameter carrying the originally requested path.
    pub return_param: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            sign_in_page: "/signin".to_string(),
            auth_pages: vec!["/signin".to_string(), "/signup".to_string()],
            public_paths: vec![
                "/signin".to_string(),
                "/signup".to_string(),
                "/forgot-password".to_string(),
                "/reset-password".to_string(),
            ],
            excluded_prefixes: vec![
                "/_next".to_string(),
                "/static".to_string(),
                "/favicon.ico".to_string(),
                "/api".to_string(),
            ],
            require_auth_everywhere: false,
            return_param: Some("from".to_string()),
        }
    }
}

impl GateConfig {
    fn validate(&self, routes: &RouteTable) -> ConfigResult<()> {
        validate_route("gate.sign_in_page", &self.sign_in_page)?;
        for page in &self.auth_pages {
            validate_route("gate.auth_pages", page)?;
        }
        for path in &self.public_paths {
            validate_route("gate.public_paths", path)?;
        }
        for prefix in &self.excluded_prefixes {
            validate_route("gate.excluded_prefixes", prefix)?;
        }
        if routes.area_of(&self.sign_in_page).is_some() {
            return Err(ConfigError::validation(
                "gate.sign_in_page",
                "sign-in page must not sit inside a role area",
            ));
        }
        if self.require_auth_everywhere && !self.public_paths.contains(&self.sign_in_page) {
            return Err(ConfigError::validation(
                "gate.public_paths",
                "must contain the sign-in page when every page requires a token",
            ));
        }
        if matches!(self.return_param.as_deref(), Some(p) if p.trim().is_empty()) {
            return Err(ConfigError::validation("gate.return_param", "must not be empty"));
        }
        Ok(())
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace.
    Trace,
    /// Debug.
    Debug,
    /// Info.
    #[default]
    Info,
    /// Warn.
    Warn,
    /// Error.
    Error,
}

impl LogLevel {
    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Compact text.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GuardConfig::default();
        config.validate().unwrap();

        assert_eq!(config.routes.sign_in, "/login");
        assert_eq!(config.storage.token_key, "access_token");
        assert_eq!(config.gate.sign_in_page, "/signin");
        assert!(config.notices.enabled);
    }

    #[test]
    fn test_route_without_slash_rejected() {
        let mut config = GuardConfig::default();
        config.routes.owner_home = "owner".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_duplicate_homes_rejected() {
        let mut config = GuardConfig::default();
        config.routes.owner_home = "/admin".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sign_in_equal_to_home_rejected() {
        let mut config = GuardConfig::default();
        config.routes.sign_in = "/customer".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_keys_rejected() {
        let mut config = GuardConfig::default();
        config.storage.token_key = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = GuardConfig::default();
        config.storage.profile_key = config.storage.token_key.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gate_sign_in_page_must_be_public() {
        let mut config = GuardConfig::default();
        config.gate.require_auth_everywhere = true;
        config.validate().unwrap();

        config.gate.public_paths.retain(|p| p != "/signin");
        assert!(config.validate().is_err());

        let mut config = GuardConfig::default();
        config.gate.sign_in_page = "/owner/signin".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_notice_messages() {
        let notices = NoticeConfig::default();
        assert_eq!(notices.message(Notice::SignInRequired), "Please sign in to continue.");
        assert_eq!(
            notices.message(Notice::NotAuthorised),
            "You are not authorised to access this area."
        );
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
