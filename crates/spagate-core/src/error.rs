// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the access guard.
//!
//! # Error Hierarchy
//!
//! ```text
//! GuardError                 - why a page may not render
//! ├── NoToken                ┐
//! ├── Decode(TokenError)     │ unauthenticated: clear session,
//! ├── MissingRole            │ redirect to sign-in
//! ├── UnknownRole            │
//! ├── Expired                ┘
//! └── RoleMismatch           - forbidden: redirect to the role's home
//!
//! TokenError                 - payload decoding failures
//! StoreError                 - session store write failures
//! ```
//!
//! None of these is fatal. The guard reports them as redirects and notices,
//! never as `Err` values to its caller.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::role::Role;

// =============================================================================
// GuardError
// =============================================================================

/// Reason a guard evaluation did not grant access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// No token is stored.
    #[error("No session token")]
    NoToken,

    /// The token payload could not be decoded.
    #[error("Invalid session token: {0}")]
    Decode(#[from] TokenError),

    /// The payload has no role claim.
    #[error("Session token has no role claim")]
    MissingRole,

    /// The role claim is not a known role.
    #[error("Session token carries unknown role '{0}'")]
    UnknownRole(String),

    /// The token expiry is in the past.
    #[error("Session expired")]
    Expired {
        /// When the token expired, if representable.
        expired_at: Option<DateTime<Utc>>,
    },

    /// The role is not permitted on this page.
    #[error("Role {role} is not permitted here")]
    RoleMismatch {
        /// The decoded role.
        role: Role,
    },
}

impl GuardError {
    /// Returns the externally observable class of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            GuardError::RoleMismatch { .. } => FailureKind::Forbidden,
            _ => FailureKind::Unauthenticated,
        }
    }

    /// Returns `true` if the failure collapses into "not signed in".
    pub fn is_unauthenticated(&self) -> bool {
        self.kind() == FailureKind::Unauthenticated
    }

    /// Returns the notice shown to the viewer for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            GuardError::NoToken => Notice::SignInRequired,
            GuardError::Decode(_) | GuardError::MissingRole | GuardError::UnknownRole(_) => {
                Notice::SessionInvalid
            }
            GuardError::Expired { .. } => Notice::SessionExpired,
            GuardError::RoleMismatch { .. } => Notice::NotAuthorised,
        }
    }

    /// Short machine-readable code, used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::NoToken => "no_token",
            GuardError::Decode(_) => "decode_failure",
            GuardError::MissingRole => "missing_role",
            GuardError::UnknownRole(_) => "unknown_role",
            GuardError::Expired { .. } => "expired",
            GuardError::RoleMismatch { .. } => "role_mismatch",
        }
    }
}

/// Externally observable class of a guard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No usable session: redirect to sign-in.
    Unauthenticated,
    /// Valid session in the wrong area: redirect to the role's home.
    Forbidden,
}

// =============================================================================
// Notice
// =============================================================================

/// User-facing notice accompanying a failed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// No token stored.
    SignInRequired,
    /// Token could not be used.
    SessionInvalid,
    /// Token expired.
    SessionExpired,
    /// Role not permitted here.
    NotAuthorised,
}

impl Notice {
    /// Returns `true` for the notices tied to a missing or broken session.
    pub fn is_session_notice(&self) -> bool {
        !matches!(self, Notice::NotAuthorised)
    }
}

// =============================================================================
// TokenError
// =============================================================================

/// Failure to decode a bearer-token payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Fewer than two dot-separated segments.
    #[error("token has no payload segment")]
    MissingPayload,

    /// Payload segment is not base64url.
    #[error("payload is not valid base64url: {0}")]
    Base64(String),

    /// Payload is not JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(String),

    /// Payload decodes to JSON `null`.
    #[error("payload is empty")]
    EmptyPayload,

    /// The `exp` claim is present but not a number.
    #[error("expiry claim is not numeric: {0}")]
    InvalidExpiry(String),
}

// =============================================================================
// StoreError
// =============================================================================

/// Result type alias for session store writes.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to persist session state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The profile could not be serialised.
    #[error("Failed to serialise {key}: {source}")]
    Serialization {
        /// Storage key being written.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The backend rejected the write.
    #[error("Storage backend rejected write to {key}: {message}")]
    Backend {
        /// Storage key being written.
        key: String,
        /// Backend message.
        message: String,
    },
}

impl StoreError {
    /// Creates a backend error.
    pub fn backend(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            key: key.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        assert_eq!(GuardError::NoToken.kind(), FailureKind::Unauthenticated);
        assert_eq!(
            GuardError::Decode(TokenError::MissingPayload).kind(),
            FailureKind::Unauthenticated
        );
        assert_eq!(GuardError::MissingRole.kind(), FailureKind::Unauthenticated);
        assert_eq!(
            GuardError::Expired { expired_at: None }.kind(),
            FailureKind::Unauthenticated
        );
        assert_eq!(
            GuardError::RoleMismatch { role: Role::Owner }.kind(),
            FailureKind::Forbidden
        );
    }

    #[test]
    fn test_notices() {
        assert_eq!(GuardError::NoToken.notice(), Notice::SignInRequired);
        assert_eq!(GuardError::MissingRole.notice(), Notice::SessionInvalid);
        assert_eq!(
            GuardError::UnknownRole("ROOT".into()).notice(),
            Notice::SessionInvalid
        );
        assert_eq!(
            GuardError::Expired { expired_at: None }.notice(),
            Notice::SessionExpired
        );
        assert!(!Notice::NotAuthorised.is_session_notice());
        assert!(Notice::SessionExpired.is_session_notice());
    }

    #[test]
    fn test_error_display() {
        let err = GuardError::RoleMismatch { role: Role::Customer };
        assert_eq!(err.to_string(), "Role CUSTOMER is not permitted here");
        assert_eq!(err.code(), "role_mismatch");
    }
}
