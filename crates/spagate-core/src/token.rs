// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token payload decoding.
//!
//! Tokens are `header.payload.signature` with base64url segments. Only the
//! payload is read. The signature is never checked here: the backend issued
//! the token and remains the authority on every request.

use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurpose, general_purpose::GeneralPurposeConfig, DecodePaddingMode},
    Engine,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{GuardError, TokenError};
use crate::role::Role;

/// Accepts padded and unpadded input and ignores stray trailing bits.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

// =============================================================================
// DecodedToken
// =============================================================================

/// Claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedToken {
    /// Raw `role` claim, when it is a non-empty string.
    pub role: Option<String>,
    /// Expiry in seconds since the epoch.
    pub exp: Option<f64>,
    /// Subject, when it is a string.
    pub sub: Option<String>,
    /// Every claim in the payload.
    pub claims: Map<String, Value>,
}

impl DecodedToken {
    fn from_value(value: Value) -> Result<Self, TokenError> {
        let claims = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let role = claims
            .get("role")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        let exp = match claims.get("exp") {
            Some(raw) => parse_expiry(raw)?,
            None => None,
        };
        let sub = claims.get("sub").and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            role,
            exp,
            sub,
            claims,
        })
    }

    /// Returns the decoded role.
    pub fn role(&self) -> Result<Role, GuardError> {
        let raw = self.role.as_deref().ok_or(GuardError::MissingRole)?;
        Role::parse(raw).ok_or_else(|| GuardError::UnknownRole(raw.to_string()))
    }

    /// Returns `true` if the token expired before `now`.
    ///
    /// A token without `exp` (or with `exp` of zero) never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) if exp != 0.0 => exp * 1000.0 < now.timestamp_millis() as f64,
            _ => false,
        }
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the expiry as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .filter(|exp| exp.is_finite())
            .and_then(|exp| DateTime::from_timestamp_millis((exp * 1000.0) as i64))
    }

    /// Returns a claim by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes the payload segment of a bearer token.
pub fn decode_payload(token: &str) -> Result<DecodedToken, TokenError> {
    let trimmed = token.trim().trim_end_matches('=');
    let mut segments = trimmed.split('.');
    let _header = segments.next();
    let payload = segments.next().ok_or(TokenError::MissingPayload)?;

    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|e| TokenError::Base64(e.to_string()))?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        // Latin-1 fallback: every byte maps to the code point of the same value.
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };

    let value: Value =
        serde_json::from_str(&text).map_err(|e| TokenError::Json(e.to_string()))?;
    if value.is_null() {
        return Err(TokenError::EmptyPayload);
    }

    DecodedToken::from_value(value)
}

/// Reads the `exp` claim.
///
/// Numbers and numeric strings are accepted. `null`, `false` and the empty
/// string mean no expiry. Anything else is rejected so that an unreadable
/// expiry never keeps a session alive.
fn parse_expiry(raw: &Value) -> Result<Option<f64>, TokenError> {
    let exp = match raw {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| TokenError::InvalidExpiry(s.clone()))?,
        ),
        other => return Err(TokenError::InvalidExpiry(other.to_string())),
    };
    match exp {
        Some(exp) if !exp.is_finite() => Err(TokenError::InvalidExpiry(exp.to_string())),
        exp => Ok(exp),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_role_and_expiry() {
        let token = token_with(r#"{"sub":"42","role":"OWNER","exp":4102444800}"#);
        let decoded = decode_payload(&token).unwrap();

        assert_eq!(decoded.role(), Ok(Role::Owner));
        assert_eq!(decoded.sub.as_deref(), Some("42"));
        assert_eq!(decoded.exp, Some(4102444800.0));
        assert!(!decoded.is_expired());
    }

    #[test]
    fn test_decode_missing_payload() {
        assert_eq!(decode_payload("onlyheader"), Err(TokenError::MissingPayload));
    }

    #[test]
    fn test_decode_invalid_base64() {
        let result = decode_payload("header.a.sig");
        assert!(matches!(result, Err(TokenError::Base64(_))));
    }

    #[test]
    fn test_decode_invalid_json() {
        let token = token_with("not json");
        assert!(matches!(decode_payload(&token), Err(TokenError::Json(_))));
    }

    #[test]
    fn test_decode_null_payload() {
        let token = token_with("null");
        assert_eq!(decode_payload(&token), Err(TokenError::EmptyPayload));
    }

    #[test]
    fn test_decode_standard_alphabet_with_padding() {
        let payload = STANDARD.encode(r#"{"role":"ADMIN","note":"??>>"}"#);
        let token = format!("h.{}.s", payload);

        let decoded = decode_payload(&token).unwrap();
        assert_eq!(decoded.role(), Ok(Role::Admin));
    }

    #[test]
    fn test_missing_and_unknown_role() {
        let decoded = decode_payload(&token_with(r#"{"exp":1}"#)).unwrap();
        assert_eq!(decoded.role(), Err(GuardError::MissingRole));

        let decoded = decode_payload(&token_with(r#"{"role":""}"#)).unwrap();
        assert_eq!(decoded.role(), Err(GuardError::MissingRole));

        let decoded = decode_payload(&token_with(r#"{"role":42}"#)).unwrap();
        assert_eq!(decoded.role(), Err(GuardError::MissingRole));

        let decoded = decode_payload(&token_with(r#"{"role":"ROOT"}"#)).unwrap();
        assert_eq!(decoded.role(), Err(GuardError::UnknownRole("ROOT".to_string())));
    }

    #[test]
    fn test_non_object_payload_has_no_claims() {
        let decoded = decode_payload(&token_with("[1,2,3]")).unwrap();
        assert!(decoded.claims.is_empty());
        assert_eq!(decoded.role(), Err(GuardError::MissingRole));
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let past = decode_payload(&token_with(r#"{"role":"ADMIN","exp":1699999999}"#)).unwrap();
        assert!(past.is_expired_at(now));

        let same = decode_payload(&token_with(r#"{"role":"ADMIN","exp":1700000000}"#)).unwrap();
        assert!(!same.is_expired_at(now));

        let none = decode_payload(&token_with(r#"{"role":"ADMIN"}"#)).unwrap();
        assert!(!none.is_expired_at(now));

        let zero = decode_payload(&token_with(r#"{"role":"ADMIN","exp":0}"#)).unwrap();
        assert!(!zero.is_expired_at(now));
        assert_eq!(past.expires_at(), DateTime::from_timestamp(1_699_999_999, 0));
    }

    #[test]
    fn test_string_expiry_is_numeric() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let past = decode_payload(&token_with(r#"{"role":"OWNER","exp":"1600000000"}"#)).unwrap();
        assert_eq!(past.exp, Some(1_600_000_000.0));
        assert!(past.is_expired_at(now));

        let future = decode_payload(&token_with(r#"{"role":"OWNER","exp":" 1800000000 "}"#)).unwrap();
        assert!(!future.is_expired_at(now));

        let blank = decode_payload(&token_with(r#"{"role":"OWNER","exp":""}"#)).unwrap();
        assert_eq!(blank.exp, None);
    }

    #[test]
    fn test_unreadable_expiry_rejected() {
        for payload in [
            r#"{"role":"OWNER","exp":"tomorrow"}"#,
            r#"{"role":"OWNER","exp":true}"#,
            r#"{"role":"OWNER","exp":{"at":1}}"#,
            r#"{"role":"OWNER","exp":"NaN"}"#,
        ] {
            let result = decode_payload(&token_with(payload));
            assert!(
                matches!(result, Err(TokenError::InvalidExpiry(_))),
                "{} decoded as {:?}",
                payload,
                result
            );
        }
    }

    #[test]
    fn test_latin1_fallback() {
        let mut bytes = br#"{"role":"CUSTOMER","name":""#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(br#""}"#);
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(&bytes));

        let decoded = decode_payload(&token).unwrap();
        assert_eq!(decoded.claim("name"), Some(&Value::String("\u{e9}".to_string())));
    }
}
