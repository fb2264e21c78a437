// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `inspect`: decode a token payload
//! - `check`: run the page guard
//! - `gate`: run the route gate
//! - `mint`: issue a development token
//! - `validate`: validate the configuration file
//! - `version`: show version information

mod check;
mod gate;
mod inspect;
mod mint;
mod validate;
mod version;

pub use check::check;
pub use gate::gate;
pub use inspect::inspect;
pub use mint::mint;
pub use validate::validate;
pub use version::version;

use spagate_config::{ConfigLoader, GuardConfig};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::{init_logging, parse_level};

/// Loads the configuration, initializes logging and runs the command.
pub async fn execute(cli: Cli) -> BinResult<()> {
    let config = load_guard_config(&cli)?;

    let level = parse_level(cli.effective_log_level(config.logging.level.as_str()));
    let format = cli.log_format.unwrap_or_else(|| config.logging.format.into());
    init_logging(&level.as_str().to_lowercase(), format);

    match cli.command.clone() {
        Commands::Inspect(args) => inspect::inspect(&cli, args),
        Commands::Check(args) => check::check(&cli, &config, args),
        Commands::Gate(args) => gate::gate(&cli, &config, args).await,
        Commands::Mint(args) => mint::mint(&cli, args),
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(&cli),
    }
}

/// Loads the configuration file, or the defaults when there is none.
pub fn load_guard_config(cli: &Cli) -> BinResult<GuardConfig> {
    let loader = ConfigLoader::new();
    let config = match cli.config_path() {
        Some(path) => loader.load(&path)?,
        None => loader.load_defaults()?,
    };
    Ok(config)
}
