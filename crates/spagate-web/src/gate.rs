// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server-side route gate.
//!
//! The gate runs before a page is served and only sees cookies, so it makes a
//! coarse decision: anonymous visitors are kept out of role areas and
//! signed-in visitors are kept off the sign-in pages and out of other roles'
//! areas. The page guard still runs afterwards.

use axum_extra::extract::cookie::CookieJar;
use spagate_config::{CookieNames, GateConfig, GuardConfig};
use spagate_core::{decode_payload, Role, RouteTable};

// =============================================================================
// Credentials
// =============================================================================

/// What the gate knows about the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token, if any.
    pub token: Option<String>,
    /// Raw role cookie, if any.
    pub role: Option<String>,
}

impl Credentials {
    /// Anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Visitor holding a token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t: &String| !t.trim().is_empty());
        self
    }

    /// Visitor holding a role cookie.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Reads credentials from request cookies.
    ///
    /// Cookie values are percent-decoded by the jar. Empty cookies count as
    /// absent.
    pub fn from_cookies(jar: &CookieJar, names: &CookieNames) -> Self {
        let value = |name: &str| {
            jar.get(name)
                .map(|cookie| cookie.value().trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            token: value(&names.token),
            role: value(&names.role),
        }
    }

    /// Returns `true` if a token is present.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Resolves the visitor's role.
    ///
    /// The role cookie wins; without a usable cookie the token's role claim
    /// is used.
    pub fn resolve_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse).or_else(|| {
            let token = self.token.as_deref()?;
            decode_payload(token).ok()?.role().ok()
        })
    }
}

// =============================================================================
// GateDecision
// =============================================================================

/// Result of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Serve the page.
    Pass,
    /// Redirect to `location`.
    Redirect {
        /// Target path, including any query string.
        location: String,
    },
}

impl GateDecision {
    fn redirect(location: impl Into<String>) -> Self {
        GateDecision::Redirect {
            location: location.into(),
        }
    }

    /// Returns the redirect location, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            GateDecision::Pass => None,
            GateDecision::Redirect { location } => Some(location),
        }
    }
}

// =============================================================================
// RouteGate
// =============================================================================

/// Cookie-based pre-check for page requests.
#[derive(Debug, Clone, Default)]
pub struct RouteGate {
    config: GateConfig,
    routes: RouteTable,
    cookies: CookieNames,
}

impl RouteGate {
    /// Creates a gate.
    pub fn new(config: GateConfig, routes: RouteTable) -> Self {
        Self {
            config,
            routes,
            cookies: CookieNames::default(),
        }
    }

    /// Creates a gate from a loaded configuration.
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.gate.clone(), config.routes.clone())
            .with_cookies(config.storage.cookies.clone())
    }

    /// Sets the cookie names.
    pub fn with_cookies(mut self, cookies: CookieNames) -> Self {
        self.cookies = cookies;
        self
    }

    /// Returns the cookie names.
    pub fn cookies(&self) -> &CookieNames {
        &self.cookies
    }

    /// Returns the gate configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Decides what to do with a request for `path`.
    pub fn decide(&self, path: &str, credentials: &Credentials) -> GateDecision {
        if self.is_excluded(path) {
            return GateDecision::Pass;
        }

        let has_token = credentials.has_token();
        let role = if has_token {
            credentials.resolve_role()
        } else {
            None
        };

        if let Some(role) = role {
            if matches_any(path, &self.config.auth_pages) {
                return GateDecision::redirect(self.routes.home_for(role));
            }
        }

        if matches_any(path, &self.config.public_paths) {
            return GateDecision::Pass;
        }

        let area = self.routes.area_of(path);

        if !has_token && (area.is_some() || self.config.require_auth_everywhere) {
            return GateDecision::redirect(self.sign_in_location(path));
        }

        match (role, area) {
            (Some(role), Some(area)) if role != area => {
                GateDecision::redirect(self.routes.home_for(role))
            }
            _ => GateDecision::Pass,
        }
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.config
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn sign_in_location(&self, path: &str) -> String {
        match &self.config.return_param {
            Some(param) if path != "/" => {
                format!("{}?{}={}", self.config.sign_in_page, param, urlencoding::encode(path))
            }
            _ => self.config.sign_in_page.clone(),
        }
    }
}

/// Returns `true` if `path` equals one of `prefixes` or continues it with `/`.
fn matches_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

// =============================================================================
// Tests
// =============================================================================
