// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # spagate-core
//!
//! Core types for guarding the customer, owner and admin areas of the spa
//! marketplace client.
//!
//! This crate provides:
//!
//! - **Role**: the three viewer roles and their membership checks
//! - **Token**: bearer-token payload decoding (no signature verification)
//! - **Routes**: sign-in and per-role home routes
//! - **Decision**: the pure `evaluate_access` function
//! - **Session**: the injected session store over a key-value backend
//! - **Error**: the guard failure taxonomy
//!
//! ## Example
//!
//! ```
//! use spagate_core::{evaluate_access, EvaluateOptions, Outcome, Role};
//!
//! let evaluation = evaluate_access(None, &[Role::Owner], &EvaluateOptions::default());
//!
//! assert!(!evaluation.decision.is_authorized);
//! assert!(matches!(evaluation.outcome, Outcome::Redirect { ref to, .. } if to == "/login"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod decision;
pub mod error;
pub mod profile;
pub mod role;
pub mod routes;
pub mod session;
pub mod token;

// =============================================================================
// Re-exports
// =============================================================================

pub use decision::{evaluate_access, AccessDecision, EvaluateOptions, Evaluation, Outcome};
pub use error::{FailureKind, GuardError, Notice, StoreError, StoreResult, TokenError};
pub use profile::{AccountStatus, UserProfile};
pub use role::{permits, Role};
pub use routes::RouteTable;
pub use session::{
    KeyValueBackend, KeyValueSessionStore, MemoryBackend, SessionStore, StorageKeys,
    UnavailableBackend,
};
pub use token::{decode_payload, DecodedToken};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
