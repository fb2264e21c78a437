// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session flows around the guard.
//!
//! These run once per user action (sign-in, sign-out, landing) rather than on
//! every page mount, so they are plain functions over a [`GuardContext`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spagate_core::{decode_payload, Role, StoreResult, UserProfile};

use crate::guard::{GuardContext, GuardOptions, RoleGuard};

/// Where [`redirect_if_authenticated`] sends a signed-in viewer by default.
pub const DEFAULT_AUTHENTICATED_DESTINATION: &str = "/customer/spas";

// =============================================================================
// SignInSession
// =============================================================================

/// Session returned by the backend after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInSession {
    /// Bearer token.
    pub access_token: String,
    /// Refresh token, not persisted by the guard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl SignInSession {
    /// Creates a session holding only a token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_in: None,
            user: None,
        }
    }

    /// Attaches the signed-in user.
    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    /// Role of the session: the user's role, else the token's role claim.
    pub fn role(&self) -> Option<Role> {
        self.user
            .as_ref()
            .map(|user| user.role)
            .or_else(|| token_role(&self.access_token))
    }
}

fn token_role(token: &str) -> Option<Role> {
    decode_payload(token).ok()?.role().ok()
}

// =============================================================================
// Flows
// =============================================================================

/// Probes access without notices.
///
/// Returns `true` only when the probe finished and the viewer may stay.
pub fn protected_route(permitted: &[Role], ctx: &GuardContext) -> bool {
    let guard = RoleGuard::new(permitted.to_vec(), ctx.clone(), GuardOptions::silent());
    guard.mount();
    let decision = guard.decision();
    guard.unmount();
    !decision.is_loading && decision.is_authorized
}

/// Persists a new session and navigates to the role's home.
///
/// The profile is cached only when the backend returned one. Without a known
/// role the viewer is sent to the sign-in route.
pub fn sign_in(ctx: &GuardContext, session: &SignInSession) -> StoreResult<Option<Role>> {
    ctx.store.write_token(&session.access_token)?;
    if let Some(user) = &session.user {
        ctx.store.write_profile(user)?;
    }

    let role = session.role();
    tracing::info!(role = ?role, "Session stored");
    ctx.navigator.replace(ctx.routes.home_for_opt(role));
    Ok(role)
}

/// Clears the session and navigates to the sign-in route.
pub fn sign_out(ctx: &GuardContext) {
    ctx.store.clear();
    tracing::info!("Session cleared");
    ctx.navigator.replace(&ctx.routes.sign_in);
}

/// Sends a viewer holding any token to `destination`.
///
/// Used on the sign-in and sign-up pages. The token is not decoded.
pub fn redirect_if_authenticated(ctx: &GuardContext, destination: Option<&str>) -> bool {
    if ctx.store.read_token().is_none() {
        return false;
    }
    ctx.navigator
        .replace(destination.unwrap_or(DEFAULT_AUTHENTICATED_DESTINATION));
    true
}

/// Sends the viewer to their role's home.
///
/// The role is taken from `role_override`, then the cached profile, then the
/// stored token. With no role the viewer is sent to sign in.
pub fn role_redirect(ctx: &GuardContext, role_override: Option<Role>) -> Option<Role> {
    let role = role_override
        .or_else(|| ctx.store.read_profile().map(|profile| profile.role))
        .or_else(|| ctx.store.read_token().as_deref().and_then(token_role));

    ctx.navigator.replace(ctx.routes.home_for_opt(role));
    role
}

/// Landing page check: a live session goes straight to its home.
///
/// Returns the role when a redirect was issued. Dead or missing sessions stay
/// on the landing page and are not cleared.
pub fn landing_redirect(ctx: &GuardContext) -> Option<Role> {
    landing_redirect_at(ctx, Utc::now())
}

/// Like [`landing_redirect`], judging expiry at `now`.
pub fn landing_redirect_at(ctx: &GuardContext, now: DateTime<Utc>) -> Option<Role> {
    let token = ctx.store.read_token()?;
    let decoded = decode_payload(&token).ok()?;
    if decoded.is_expired_at(now) {
        tracing::debug!("Stored session expired, staying on landing page");
        return None;
    }

    let role = decoded.role().ok();
    ctx.navigator.replace(ctx.routes.home_for_opt(role));
    role
}

// =============================================================================
// Tests
// =============================================================================
