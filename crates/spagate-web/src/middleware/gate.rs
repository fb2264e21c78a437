// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route gate middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use spagate_config::CookieNames;
use tower::{Layer, Service};

use crate::gate::{Credentials, GateDecision, RouteGate};

// =============================================================================
// RouteGateLayer
// =============================================================================

/// Layer running the route gate in front of page handlers.
///
/// Redirects are answered with `307 Temporary Redirect`; everything else is
/// forwarded to the inner service.
#[derive(Clone)]
pub struct RouteGateLayer {
    gate: Arc<RouteGate>,
}

impl RouteGateLayer {
    /// Creates a layer.
    pub fn new(gate: RouteGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }

    /// Creates a layer sharing an existing gate.
    pub fn from_shared(gate: Arc<RouteGate>) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for RouteGateLayer {
    type Service = RouteGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RouteGateService {
            inner,
            gate: self.gate.clone(),
        }
    }
}

// =============================================================================
// RouteGateService
// =============================================================================

/// Service produced by [`RouteGateLayer`].
#[derive(Clone)]
pub struct RouteGateService<S> {
    inner: S,
    gate: Arc<RouteGate>,
}

impl<S> Service<Request<Body>> for RouteGateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let credentials = extract_credentials(&req, self.gate.cookies());
        let decision = self.gate.decide(req.uri().path(), &credentials);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match decision {
                GateDecision::Pass => inner.call(req).await,
                GateDecision::Redirect { location } => {
                    tracing::debug!(
                        path = %req.uri().path(),
                        location = %location,
                        "Route gate redirect"
                    );
                    Ok(redirect_response(&location))
                }
            }
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reads the gate credentials from cookies, with a bearer header fallback for the token.
fn extract_credentials<B>(req: &Request<B>, names: &CookieNames) -> Credentials {
    let jar = CookieJar::from_headers(req.headers());
    let mut credentials = Credentials::from_cookies(&jar, names);

    if credentials.token.is_none() {
        credentials.token = extract_bearer_token(req);
    }
    credentials
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn redirect_response(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location = %location, error = %e, "Invalid redirect location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut req = Request::builder().uri("/owner").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer a.b.c"));
        assert_eq!(extract_bearer_token(&req), Some("a.b.c".to_string()));
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let req = Request::builder()
            .uri("/owner")
            .header(header::COOKIE, "token=from.cookie.sig")
            .header(header::COOKIE, "role=OWNER")
            .header(header::AUTHORIZATION, "Bearer from.header.sig")
            .body(Body::empty())
            .unwrap();

        let credentials = extract_credentials(&req, &CookieNames::default());
        assert_eq!(credentials.token.as_deref(), Some("from.cookie.sig"));
        assert_eq!(credentials.role.as_deref(), Some("OWNER"));
    }

    #[test]
    fn test_encoded_cookie_values() {
        let req = Request::builder()
            .uri("/owner")
            .header(header::COOKIE, "token=a.b.c; role=ADMIN%20")
            .body(Body::empty())
            .unwrap();

        let credentials = extract_credentials(&req, &CookieNames::default());
        assert_eq!(credentials.role.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_redirect_response() {
        let response = redirect_response("/signin?from=%2Fowner");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/signin?from=%2Fowner"
        );
    }
}
