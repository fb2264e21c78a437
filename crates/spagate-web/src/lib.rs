// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # spagate-web
//!
//! Adapters around the pure access decision in `spagate-core`.
//!
//! - [`RoleGuard`]: the reactive page guard (mount, re-evaluate, unmount)
//! - [`flows`]: sign-in, sign-out and the redirect helpers that surround the guard
//! - [`RouteGate`]: the cookie-based pre-check run before a page is served,
//!   exposed to axum routers as [`RouteGateLayer`]

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod flows;
pub mod gate;
pub mod guard;
pub mod middleware;
pub mod navigate;
pub mod notify;

pub use flows::{
    landing_redirect, landing_redirect_at, protected_route, redirect_if_authenticated, role_redirect, sign_in,
    sign_out, SignInSession, DEFAULT_AUTHENTICATED_DESTINATION,
};
pub use gate::{Credentials, GateDecision, RouteGate};
pub use guard::{GuardContext, GuardOptions, RoleGuard};
pub use middleware::{RouteGateLayer, RouteGateService};
pub use navigate::{Navigator, TracingNavigator};
pub use notify::{Notifier, TracingNotifier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
