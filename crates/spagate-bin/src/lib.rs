// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # spagate-bin
//!
//! Developer CLI for the access guard.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────┐
//!                    │   main.rs   │
//!                    └──────┬──────┘
//!                           │
//!                    ┌──────▼──────┐
//!                    │    cli.rs   │
//!                    └──────┬──────┘
//!                           │
//!               ┌───────────┴───────────┐
//!               ▼                       ▼
//!        ┌──────────┐             ┌──────────┐
//!        │ commands │             │ logging  │
//!        └────┬─────┘             └──────────┘
//!             │
//!      ┌──────┴──────┐
//!      │ spagate-*   │
//!      └─────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Decode a token payload
//! spagate inspect eyJhbGciOi...
//!
//! # Run the page guard for an owner-only page
//! spagate check eyJhbGciOi... --role OWNER
//!
//! # Run the route gate for a path
//! spagate gate /admin/spas --token eyJhbGciOi... --role CUSTOMER
//!
//! # Issue a development token
//! spagate mint --role ADMIN --expires-in 600
//!
//! # Validate configuration
//! spagate -c spagate.yaml validate
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
