// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access decision.
//!
//! [`evaluate_access`] is the whole guard policy as a pure function: it reads
//! nothing but its arguments and performs no side effects. The adapter that
//! clears storage, shows notices and navigates lives in `spagate-web`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GuardError;
use crate::role::{permits, Role};
use crate::routes::RouteTable;
use crate::token::decode_payload;

// =============================================================================
// AccessDecision
// =============================================================================

/// What a page needs to know to render or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    /// Decoded role, if the session is usable.
    pub role: Option<Role>,
    /// Whether the page may render.
    pub is_authorized: bool,
    /// Whether no evaluation has completed yet.
    pub is_loading: bool,
}

impl AccessDecision {
    /// Value before the first evaluation completes.
    pub const fn loading() -> Self {
        Self {
            role: None,
            is_authorized: false,
            is_loading: true,
        }
    }

    /// No usable session.
    pub const fn unauthenticated() -> Self {
        Self {
            role: None,
            is_authorized: false,
            is_loading: false,
        }
    }

    /// Usable session with the given verdict.
    pub const fn resolved(role: Role, is_authorized: bool) -> Self {
        Self {
            role: Some(role),
            is_authorized,
            is_loading: false,
        }
    }
}

impl Default for AccessDecision {
    fn default() -> Self {
        Self::loading()
    }
}

// =============================================================================
// Outcome / Evaluation
// =============================================================================

/// Side effect the adapter must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Render the page.
    Granted,
    /// Navigate away.
    Redirect {
        /// Target route.
        to: String,
        /// Why access was refused.
        reason: GuardError,
        /// Whether the session store must be cleared first.
        clear_session: bool,
    },
}

impl Outcome {
    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Outcome::Granted => None,
            Outcome::Redirect { to, .. } => Some(to),
        }
    }

    /// Returns the failure, if any.
    pub fn reason(&self) -> Option<&GuardError> {
        match self {
            Outcome::Granted => None,
            Outcome::Redirect { reason, .. } => Some(reason),
        }
    }

    /// Returns `true` if the session store must be cleared.
    pub fn clears_session(&self) -> bool {
        matches!(self, Outcome::Redirect { clear_session: true, .. })
    }
}

/// Result of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Decision reported to the page.
    pub decision: AccessDecision,
    /// Side effect to perform.
    pub outcome: Outcome,
}

impl Evaluation {
    fn granted(role: Role) -> Self {
        Self {
            decision: AccessDecision::resolved(role, true),
            outcome: Outcome::Granted,
        }
    }

    fn unauthenticated(reason: GuardError, routes: &RouteTable) -> Self {
        Self {
            decision: AccessDecision::unauthenticated(),
            outcome: Outcome::Redirect {
                to: routes.sign_in.clone(),
                reason,
                clear_session: true,
            },
        }
    }

    fn forbidden(role: Role, routes: &RouteTable) -> Self {
        Self {
            decision: AccessDecision::resolved(role, false),
            outcome: Outcome::Redirect {
                to: routes.home_for(role).to_string(),
                reason: GuardError::RoleMismatch { role },
                clear_session: false,
            },
        }
    }
}

// =============================================================================
// evaluate_access
// =============================================================================

/// Inputs to [`evaluate_access`] besides the token and the permitted roles.
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    /// Redirect targets.
    pub routes: RouteTable,
    /// Evaluation instant; `None` uses the wall clock.
    pub now: Option<DateTime<Utc>>,
}

impl EvaluateOptions {
    /// Creates options with the given routes.
    pub fn new(routes: RouteTable) -> Self {
        Self { routes, now: None }
    }

    /// Pins the evaluation instant.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// Decides whether a viewer holding `token` may open a page gated to `permitted`.
///
/// An empty `permitted` list admits any signed-in role. Decoding problems,
/// a missing or unknown role claim and expiry are all reported as an
/// unauthenticated session; only a role mismatch keeps the session and sends
/// the viewer to their own home.
pub fn evaluate_access(
    token: Option<&str>,
    permitted: &[Role],
    options: &EvaluateOptions,
) -> Evaluation {
    let routes = &options.routes;

    let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return Evaluation::unauthenticated(GuardError::NoToken, routes),
    };

    let decoded = match decode_payload(token) {
        Ok(decoded) => decoded,
        Err(e) => return Evaluation::unauthenticated(GuardError::Decode(e), routes),
    };

    let role = match decoded.role() {
        Ok(role) => role,
        Err(e) => return Evaluation::unauthenticated(e, routes),
    };

    let now = options.now.unwrap_or_else(Utc::now);
    if decoded.is_expired_at(now) {
        let reason = GuardError::Expired {
            expired_at: decoded.expires_at(),
        };
        return Evaluation::unauthenticated(reason, routes);
    }

    if !permits(permitted, role) {
        return Evaluation::forbidden(role, routes);
    }

    Evaluation::granted(role)
}

// =============================================================================
// Tests
// =============================================================================
