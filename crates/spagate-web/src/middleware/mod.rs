// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware for axum routers.
//!
//! - [`RouteGateLayer`]: runs the [`RouteGate`](crate::gate::RouteGate) before
//!   page handlers

mod gate;

pub use gate::{RouteGateLayer, RouteGateService};
