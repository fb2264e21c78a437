// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `mint` command.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use spagate_core::Role;

use crate::cli::{Cli, MintArgs};
use crate::error::{BinError, BinResult};

/// Claims carried by a development token.
#[derive(Debug, Serialize)]
struct DevClaims<'a> {
    sub: &'a str,
    role: Role,
    iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Issues an HS256 development token and prints it.
pub fn mint(cli: &Cli, args: MintArgs) -> BinResult<()> {
    let token = mint_token(&args, Utc::now().timestamp())?;
    if cli.is_verbose() {
        eprintln!(
            "Issued {} token for '{}' ({})",
            args.role,
            args.sub,
            if args.expires_in == 0 {
                "no expiry".to_string()
            } else {
                format!("expires in {}s", args.expires_in)
            }
        );
    }
    println!("{}", token);
    Ok(())
}

fn mint_token(args: &MintArgs, issued_at: i64) -> BinResult<String> {
    if args.secret.is_empty() {
        return Err(BinError::invalid_argument("mint secret must not be empty"));
    }
    let lifetime = i64::try_from(args.expires_in)
        .map_err(|_| BinError::invalid_argument("--expires-in is too large"))?;

    let claims = DevClaims {
        sub: &args.sub,
        role: args.role,
        iat: issued_at,
        exp: (lifetime > 0).then(|| issued_at.saturating_add(lifetime)),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(args.secret.as_bytes()),
    )?;

    tracing::debug!(role = %args.role, sub = %args.sub, "Development token issued");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spagate_core::decode_payload;

    fn args(role: Role, expires_in: u64) -> MintArgs {
        MintArgs {
            role,
            sub: "dev-user".to_string(),
            expires_in,
            secret: "test-secret".to_string(),
        }
    }

    #[test]
    fn test_minted_token_decodes() {
        let token = mint_token(&args(Role::Owner, 600), 1_700_000_000).unwrap();
        let decoded = decode_payload(&token).unwrap();

        assert_eq!(decoded.role().unwrap(), Role::Owner);
        assert_eq!(decoded.sub.as_deref(), Some("dev-user"));
        assert_eq!(decoded.exp, Some(1_700_000_600.0));
    }

    #[test]
    fn test_zero_lifetime_omits_expiry() {
        let token = mint_token(&args(Role::Admin, 0), 1_700_000_000).unwrap();
        assert_eq!(decode_payload(&token).unwrap().exp, None);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut args = args(Role::Customer, 60);
        args.secret.clear();
        assert!(mint_token(&args, 0).is_err());
    }
}
