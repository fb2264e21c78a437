// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `inspect`: decode a token payload
//! - `check`: run the page guard against a token
//! - `gate`: run the route gate for a request path
//! - `mint`: issue a development token
//! - `validate`: validate the configuration file
//! - `version`: show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use spagate_core::Role;

/// Configuration file picked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "spagate.yaml";

// =============================================================================
// Main CLI Structure
// =============================================================================

/// SPAGATE - access guard tooling for the spa marketplace client
///
/// Decodes bearer tokens, runs the page guard and the route gate, and issues
/// development tokens for the customer, owner and admin areas.
#[derive(Parser, Debug)]
#[command(
    name = "spagate",
    author = "Sylvex <contact@sylvex.io>",
    version = spagate_core::VERSION,
    about = "Access guard tooling for the spa marketplace client",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (defaults to ./spagate.yaml when present)
    #[arg(short, long, env = "SPAGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SPAGATE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact)
    #[arg(long, env = "SPAGATE_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Decode a token payload
    ///
    /// Prints the role, subject, expiry and every claim. The signature is not
    /// checked.
    Inspect(InspectArgs),

    /// Run the page guard
    ///
    /// Evaluates a token against the roles a page admits and prints the
    /// decision, the redirect and the notice the viewer would see.
    Check(CheckArgs),

    /// Run the route gate
    ///
    /// Sends a request for PATH through the gate middleware and prints the
    /// response status and location.
    Gate(GateArgs),

    /// Issue a development token
    ///
    /// Signs an HS256 token carrying a role claim. Intended for local testing
    /// against the guard only.
    Mint(MintArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `inspect` command.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Bearer token
    pub token: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Bearer token; omit to check an anonymous viewer
    pub token: Option<String>,

    /// Role admitted by the page (repeatable; none admits any role)
    #[arg(short, long = "role")]
    pub roles: Vec<Role>,

    /// Evaluate at this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `gate` command.
#[derive(Args, Debug, Clone)]
pub struct GateArgs {
    /// Request path
    pub path: String,

    /// Token cookie value
    #[arg(short, long)]
    pub token: Option<String>,

    /// Role cookie value
    #[arg(short, long)]
    pub role: Option<String>,

    /// Send the token as an Authorization header instead of a cookie
    #[arg(long, requires = "token")]
    pub bearer: bool,
}

/// Arguments for the `mint` command.
#[derive(Args, Debug, Clone)]
pub struct MintArgs {
    /// Role claim
    #[arg(short, long)]
    pub role: Role,

    /// Subject claim
    #[arg(short, long, default_value = "dev-user")]
    pub sub: String,

    /// Lifetime in seconds; 0 omits the expiry claim
    #[arg(short, long, default_value = "3600")]
    pub expires_in: u64,

    /// HMAC secret
    #[arg(long, env = "SPAGATE_MINT_SECRET", default_value = "spagate-development-secret")]
    pub secret: String,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<spagate_config::LogFormat> for LogFormat {
    fn from(format: spagate_config::LogFormat) -> Self {
        match format {
            spagate_config::LogFormat::Text => LogFormat::Text,
            spagate_config::LogFormat::Json => LogFormat::Json,
            spagate_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the configuration file to load, if any.
    ///
    /// An explicit path is always returned; the default file only when it
    /// exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level based on flags, falling back to `configured`.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
