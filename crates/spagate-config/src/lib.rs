// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # spagate-config
//!
//! Configuration for the access guard and the route gate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spagate_config::loader::load_config;
//!
//! let config = load_config("spagate.yaml").unwrap();
//! println!("Sign-in route: {}", config.routes.sign_in);
//! ```
//!
//! ## Configuration Schema
//!
//! - `routes` - sign-in route and role homes
//! - `storage` - session storage keys and gate cookie names
//! - `notices` - toast texts and the global notice switch
//! - `gate` - server-side route gate rules
//! - `logging` - log level and format
//!
//! ```yaml
//! routes:
//!   sign_in: /login
//!   customer_home: /customer
//!   owner_home: /owner
//!   admin_home: /admin
//! storage:
//!   token_key: access_token
//!   profile_key: bbh_user_profile
//! notices:
//!   enabled: true
//! gate:
//!   sign_in_page: /signin
//!   require_auth_everywhere: false
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    CookieNames, GateConfig, GuardConfig, LogFormat, LogLevel, LoggingConfig, NoticeConfig,
    StorageConfig,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
