// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # SPAGATE Integration Tests
//!
//! Integration tests for the access guard, the session flows, the route gate
//! and configuration loading.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: signed tokens, profiles and configuration files
//!   - `builders`: [`GuardHarnessBuilder`](common::builders::GuardHarnessBuilder)
//!   - `harness`: a guard context wired to recording collaborators
//!   - `assertions`: decision and navigation assertions
//!   - `mocks`: recording navigator and notifier, failing storage
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p spagate-tests
//! cargo test -p spagate-tests --test integration_guard
//! cargo test -p spagate-tests --test integration_gate
//! cargo test -p spagate-tests --test integration_config
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use spagate_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let harness = GuardHarnessBuilder::new()
//!         .token(TokenFixtures::valid(Role::Owner))
//!         .build();
//!     let guard = harness.guard(&[Role::Owner]);
//!     guard.mount();
//!     guard.decision().assert_granted(Role::Owner);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;
    pub use crate::common::mocks::*;
    pub use spagate_core::Role;
}
