// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use spagate_config::{load_config, GuardConfig};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = cli.config_path().ok_or_else(|| {
        BinError::Configuration(
            "No configuration file given and ./spagate.yaml does not exist".to_string(),
        )
    })?;

    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = load_config(&config_path).map_err(|e| {
        BinError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Sign-in route: {}", config.routes.sign_in);
            println!(
                "  Role homes:    {}, {}, {}",
                config.routes.customer_home, config.routes.owner_home, config.routes.admin_home
            );
            println!(
                "  Storage keys:  {}, {}",
                config.storage.token_key, config.storage.profile_key
            );
            println!("  Notices:       {}", if config.notices.enabled { "enabled" } else { "disabled" });
            println!("  Gate sign-in:  {}", config.gate.sign_in_page);
            println!(
                "  Gate scope:    {}",
                if config.gate.require_auth_everywhere { "every page" } else { "role areas" }
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "sign_in": config.routes.sign_in,
                    "customer_home": config.routes.customer_home,
                    "owner_home": config.routes.owner_home,
                    "admin_home": config.routes.admin_home,
                    "notices_enabled": config.notices.enabled,
                    "gate_sign_in_page": config.gate.sign_in_page,
                    "require_auth_everywhere": config.gate.require_auth_everywhere,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::Configuration(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Settings that are valid but probably not intended.
fn collect_warnings(config: &GuardConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.notices.enabled {
        warnings.push("Notices are disabled for every guard".to_string());
    }
    for page in &config.gate.auth_pages {
        if !config.gate.public_paths.contains(page) {
            warnings.push(format!("Auth page '{}' is not a public path", page));
        }
    }
    if config.gate.excluded_prefixes.iter().any(|p| p == "/") {
        warnings.push("Excluded prefix '/' disables the route gate".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(collect_warnings(&GuardConfig::default()).is_empty());
    }

    #[test]
    fn test_warnings() {
        let mut config = GuardConfig::default();
        config.notices.enabled = false;
        config.gate.public_paths.clear();
        config.gate.excluded_prefixes.push("/".to_string());

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 4);
    }
}
