// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Tokens are signed with `jsonwebtoken` so they look exactly like what the
//! backend issues. The guard never checks the signature.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use spagate_core::{AccountStatus, Role, UserProfile};

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture providing bearer tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Secret used to sign fixture tokens.
    pub const SECRET: &'static [u8] = b"spagate-fixture-secret";

    /// Fixed evaluation instant used by deterministic tests.
    pub fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).expect("valid timestamp")
    }

    /// Signs arbitrary claims with HS256.
    pub fn signed(claims: Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(Self::SECRET))
            .expect("Failed to sign fixture token")
    }

    /// Token for `role` expiring one hour after the wall clock.
    pub fn valid(role: Role) -> String {
        Self::expiring(role, Utc::now() + Duration::hours(1))
    }

    /// Token for `role` that expired one hour before the wall clock.
    pub fn expired(role: Role) -> String {
        Self::expiring(role, Utc::now() - Duration::hours(1))
    }

    /// Token for `role` expiring at `at`.
    pub fn expiring(role: Role, at: DateTime<Utc>) -> String {
        Self::signed(json!({
            "sub": format!("{}-user", role.as_str().to_lowercase()),
            "role": role,
            "iat": at.timestamp() - 7200,
            "exp": at.timestamp(),
        }))
    }

    /// Token for `role` without an `exp` claim.
    pub fn without_expiry(role: Role) -> String {
        Self::signed(json!({ "sub": "42", "role": role }))
    }

    /// Token whose payload carries no role claim.
    pub fn without_role() -> String {
        Self::signed(json!({ "sub": "42", "exp": (Utc::now() + Duration::hours(1)).timestamp() }))
    }

    /// Token carrying a role the client does not know.
    pub fn unknown_role() -> String {
        Self::signed(json!({ "sub": "42", "role": "SUPERVISOR" }))
    }

    /// Token whose payload segment is `payload` encoded as-is.
    pub fn raw_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    /// Token that does not decode at all.
    pub fn malformed() -> String {
        "not-a-bearer-token".to_string()
    }
}

// =============================================================================
// Profile Fixtures
// =============================================================================

/// Fixture providing cached user profiles.
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// A customer account.
    pub fn customer() -> UserProfile {
        UserProfile::new(101, "mai@example.com", Role::Customer)
            .with_name("Mai Tran")
            .with_status(AccountStatus::Active)
    }

    /// A spa owner account.
    pub fn owner() -> UserProfile {
        UserProfile::new(202, "owner@lotus-spa.example", Role::Owner)
            .with_name("Lotus Spa")
            .with_status(AccountStatus::Active)
    }

    /// An admin account.
    pub fn admin() -> UserProfile {
        UserProfile::new(1, "admin@example.com", Role::Admin).with_status(AccountStatus::Active)
    }

    /// Profile for `role`.
    pub fn for_role(role: Role) -> UserProfile {
        match role {
            Role::Customer => Self::customer(),
            Role::Owner => Self::owner(),
            Role::Admin => Self::admin(),
        }
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing configuration files.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// YAML configuration with custom routes, keys and notices.
    pub fn custom_yaml() -> &'static str {
        r#"
routes:
  sign_in: /auth/login
  customer_home: /me
  owner_home: /studio
  admin_home: /console
storage:
  token_key: bbh_token
  profile_key: bbh_profile
  cookies:
    token: bbh_token
    role: bbh_role
notices:
  sign_in_required: "Sign in first."
gate:
  sign_in_page: /auth/signin
  auth_pages: [/auth/signin]
  public_paths: [/auth/signin, /auth/signup]
logging:
  level: debug
  format: json
"#
    }

    /// TOML configuration requiring a token on every page.
    pub fn strict_toml() -> &'static str {
        r#"
[notices]
enabled = false

[gate]
require_auth_everywhere = true
return_param = "next"
"#
    }

    /// JSON configuration overriding only the sign-in route.
    pub fn minimal_json() -> &'static str {
        r#"{ "routes": { "sign_in": "/signin" } }"#
    }

    /// YAML configuration that fails validation.
    pub fn invalid_yaml() -> &'static str {
        r#"
routes:
  owner_home: /admin
"#
    }
}
