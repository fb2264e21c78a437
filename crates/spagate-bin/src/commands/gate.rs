// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gate` command.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use spagate_config::GuardConfig;
use spagate_web::{RouteGate, RouteGateLayer};
use tower::ServiceExt;

use crate::cli::{Cli, GateArgs};
use crate::error::{BinError, BinResult};

/// Sends one request through the gate middleware and prints the response.
pub async fn gate(_cli: &Cli, config: &GuardConfig, args: GateArgs) -> BinResult<()> {
    let gate = RouteGate::from_config(config);
    let request = build_request(&gate, &args)?;

    let app = Router::new()
        .fallback(|| async { StatusCode::OK })
        .layer(RouteGateLayer::new(gate));

    let response = app
        .oneshot(request)
        .await
        .map_err(|e| BinError::runtime(format!("gate request failed: {}", e)))?;

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok());

    match location {
        Some(location) => println!("{} {} -> {}", response.status().as_u16(), args.path, location),
        None => println!("{} {} (served)", response.status().as_u16(), args.path),
    }
    Ok(())
}

fn build_request(gate: &RouteGate, args: &GateArgs) -> BinResult<Request<Body>> {
    if !args.path.starts_with('/') {
        return Err(BinError::invalid_argument(format!(
            "path '{}' must start with '/'",
            args.path
        )));
    }

    let names = gate.cookies();
    let mut cookies = Vec::new();
    let mut builder = Request::builder().uri(args.path.as_str());

    if let Some(token) = &args.token {
        if args.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        } else {
            cookies.push(format!("{}={}", names.token, token));
        }
    }
    if let Some(role) = &args.role {
        cookies.push(format!("{}={}", names.role, role));
    }
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }

    builder
        .body(Body::empty())
        .map_err(|e| BinError::invalid_argument(e.to_string()))
}
