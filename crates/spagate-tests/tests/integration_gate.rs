// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Route Gate Integration Tests
//!
//! The gate mounted as middleware in front of an axum router.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::json;
use spagate_config::{ConfigFormat, ConfigLoader, GateConfig};
use spagate_core::RouteTable;
use spagate_tests::prelude::*;
use spagate_web::{Credentials, RouteGate, RouteGateLayer};
use tower::ServiceExt;

fn app(gate: RouteGate) -> Router {
    Router::new()
        .fallback(|| async { "page" })
        .layer(RouteGateLayer::new(gate))
}

async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.expect("router is infallible")
}

fn get(path: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(path)
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_gate_anonymous_kept_out_of_role_areas() {
    init_test_logging();

    for path in ["/customer", "/owner/services", "/admin/spas/3"] {
        let response = send(app(RouteGate::default()), get(path).body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let expected = format!("/signin?from={}", urlencoding::encode(path));
        assert_eq!(location(&response), Some(expected.as_str()));
    }
}

#[tokio::test]
async fn test_gate_public_pages_served() {
    for path in ["/", "/spas/17", "/signin", "/forgot-password"] {
        let response = send(app(RouteGate::default()), get(path).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK, "{} should be served", path);
    }
}

#[tokio::test]
async fn test_gate_assets_never_gated() {
    let config = GateConfig {
        require_auth_everywhere: true,
        ..GateConfig::default()
    };
    let gate = RouteGate::new(config, RouteTable::default());

    for path in ["/_next/static/app.js", "/api/spas", "/favicon.ico"] {
        let response = send(app(gate.clone()), get(path).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK, "{} should pass", path);
    }
}

#[tokio::test]
async fn test_gate_foreign_area_sends_home() {
    let request = get("/admin/users")
        .header(header::COOKIE, "token=a.b.c; role=CUSTOMER")
        .body(Body::empty())
        .unwrap();

    let response = send(app(RouteGate::default()), request).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/customer"));
}

#[tokio::test]
async fn test_gate_signed_in_kept_off_sign_in() {
    let request = get("/signin")
        .header(header::COOKIE, "token=a.b.c; role=OWNER")
        .body(Body::empty())
        .unwrap();

    let response = send(app(RouteGate::default()), request).await;

    assert_eq!(location(&response), Some("/owner"));
}

#[tokio::test]
async fn test_gate_bearer_header_with_token_role() {
    let token = TokenFixtures::valid(Role::Admin);

    let own_area = get("/admin/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = send(app(RouteGate::default()), own_area).await;
    assert_eq!(response.status(), StatusCode::OK);

    let other_area = get("/owner")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = send(app(RouteGate::default()), other_area).await;
    assert_eq!(location(&response), Some("/admin"));
}

#[tokio::test]
async fn test_gate_token_without_role_passes_to_page_guard() {
    // The gate cannot place the visitor; the page guard decides.
    let token = TokenFixtures::signed(json!({ "sub": "9" }));
    let request = get("/owner")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();

    let response = send(app(RouteGate::default()), request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_gate_strict_configuration() {
    let config = ConfigLoader::new()
        .with_env_vars(false)
        .load_from_str(ConfigFixtures::strict_toml(), ConfigFormat::Toml)
        .expect("strict config");
    let gate = RouteGate::from_config(&config);

    assert_gate_redirect(
        &gate.decide("/spas/17", &Credentials::anonymous()),
        "/signin?next=%2Fspas%2F17",
    );
    assert_gate_redirect(&gate.decide("/", &Credentials::anonymous()), "/signin");
    assert_gate_pass(&gate.decide("/signup", &Credentials::anonymous()));

    let response = send(app(gate), get("/spas/17?tab=reviews").body(Body::empty()).unwrap()).await;
    assert_eq!(location(&response), Some("/signin?next=%2Fspas%2F17"));
}

#[tokio::test]
async fn test_gate_custom_cookies_and_routes() {
    let config = ConfigLoader::new()
        .with_env_vars(false)
        .load_from_str(ConfigFixtures::custom_yaml(), ConfigFormat::Yaml)
        .expect("custom config");
    let gate = RouteGate::from_config(&config);

    // Default cookie names are ignored.
    let request = get("/studio/bookings")
        .header(header::COOKIE, "token=a.b.c; role=OWNER")
        .body(Body::empty())
        .unwrap();
    let response = send(app(gate.clone()), request).await;
    assert_eq!(location(&response), Some("/auth/signin?from=%2Fstudio%2Fbookings"));

    let request = get("/console")
        .header(header::COOKIE, "bbh_token=a.b.c; bbh_role=OWNER")
        .body(Body::empty())
        .unwrap();
    let response = send(app(gate.clone()), request).await;
    assert_eq!(location(&response), Some("/studio"));

    let request = get("/auth/signin")
        .header(header::COOKIE, "bbh_token=a.b.c; bbh_role=customer")
        .body(Body::empty())
        .unwrap();
    let response = send(app(gate), request).await;
    assert_eq!(location(&response), Some("/me"));
}

#[tokio::test]
async fn test_gate_return_path_is_lossless() {
    let request = get("/owner/spa%20one/photos").body(Body::empty()).unwrap();

    let response = send(app(RouteGate::default()), request).await;

    let target = location(&response).expect("redirect");
    assert_eq!(target, "/signin?from=%2Fowner%2Fspa%2520one%2Fphotos");
    let from = target.strip_prefix("/signin?from=").expect("from parameter");
    assert_eq!(urlencoding::decode(from).expect("utf-8"), "/owner/spa%20one/photos");
}

#[tokio::test]
async fn test_gate_encoded_role_cookie() {
    let request = get("/owner/staff")
        .header(header::COOKIE, "token=a.b.c; role=CUSTOMER%20")
        .body(Body::empty())
        .unwrap();

    let response = send(app(RouteGate::default()), request).await;

    assert_eq!(location(&response), Some("/customer"));
}

#[tokio::test]
async fn test_gate_without_return_param() {
    let config = GateConfig {
        return_param: None,
        ..GateConfig::default()
    };
    let gate = RouteGate::new(config, RouteTable::default());

    assert_gate_redirect(&gate.decide("/owner/staff", &Credentials::anonymous()), "/signin");
}
