// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `inspect` command.

use chrono::Utc;
use spagate_core::decode_payload;

use crate::cli::{Cli, InspectArgs, OutputFormat};
use crate::error::BinResult;

/// Decodes a token payload and prints its claims.
pub fn inspect(_cli: &Cli, args: InspectArgs) -> BinResult<()> {
    let decoded = decode_payload(&args.token)?;
    let role = decoded.role();
    let expired = decoded.is_expired_at(Utc::now());

    match args.format {
        OutputFormat::Text => {
            println!("Token payload (signature not verified)");
            println!();
            match &role {
                Ok(role) => println!("  Role:    {}", role),
                Err(e) => println!("  Role:    invalid ({})", e),
            }
            println!("  Subject: {}", decoded.sub.as_deref().unwrap_or("-"));
            match decoded.expires_at() {
                Some(at) => println!(
                    "  Expires: {}{}",
                    at.to_rfc3339(),
                    if expired { " (expired)" } else { "" }
                ),
                None => println!("  Expires: never"),
            }
            println!();
            println!("Claims:");
            println!("{}", serde_json::to_string_pretty(&decoded.claims)?);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "role": role.as_ref().ok().map(|r| r.as_str()),
                "role_error": role.as_ref().err().map(|e| e.code()),
                "sub": decoded.sub,
                "exp": decoded.exp,
                "expires_at": decoded.expires_at().map(|at| at.to_rfc3339()),
                "expired": expired,
                "claims": decoded.claims,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
