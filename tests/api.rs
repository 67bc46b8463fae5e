//! Router-level tests for the registration and login endpoints.
//!
//! Each test builds a fresh application around its own registry and drives it
//! with `oneshot` requests, so no socket is bound.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, HeaderValue, Method, Request, StatusCode},
    response::Response,
    Router,
};
use credstore::{api, registry::Registry};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const REGISTER: &str = "/api/v1/auth/register";
const LOGIN: &str = "/api/v1/auth/login";

fn app() -> (Router, Arc<Registry>) {
    let registry = Arc::new(Registry::new());
    (api::app(Arc::clone(&registry), None), registry)
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> Result<Response> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;

    Ok(app.clone().oneshot(request).await?)
}

async fn body_json(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn register_then_login() -> Result<()> {
    let (app, _registry) = app();
    let credentials = json!({"email": "alice@example.com", "password": "secret"});

    let response = post_json(&app, REGISTER, &credentials).await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await?;
    assert_eq!(body, json!({"id": 1, "email": "alice@example.com"}));

    let response = post_json(&app, REGISTER, &credentials).await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await?,
        json!({"error": "User already exists"})
    );

    let response = post_json(&app, LOGIN, &credentials).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap_or_default();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let response = post_json(
        &app,
        LOGIN,
        &json!({"email": "alice@example.com", "password": "wrong"}),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await?,
        json!({"error": "Invalid credentials"})
    );

    Ok(())
}

#[tokio::test]
async fn register_response_never_contains_secret() -> Result<()> {
    let (app, _registry) = app();

    let response = post_json(
        &app,
        REGISTER,
        &json!({"email": "bob@example.com", "password": "hunter2"}),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let text = String::from_utf8_lossy(&bytes);
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("password"));

    Ok(())
}

#[tokio::test]
async fn username_alias_is_accepted() -> Result<()> {
    let (app, registry) = app();
    let credentials = json!({"username": "alice", "password": "secret"});

    let response = post_json(&app, REGISTER, &credentials).await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(registry.get("alice").is_some());

    let response = post_json(&app, LOGIN, &credentials).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_the_same() -> Result<()> {
    let (app, _registry) = app();
    post_json(
        &app,
        REGISTER,
        &json!({"email": "carol@example.com", "password": "right"}),
    )
    .await?;

    let unknown = post_json(
        &app,
        LOGIN,
        &json!({"email": "nobody@example.com", "password": "right"}),
    )
    .await?;
    let wrong = post_json(
        &app,
        LOGIN,
        &json!({"email": "carol@example.com", "password": "wrong"}),
    )
    .await?;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), unknown.status());
    assert_eq!(body_json(unknown).await?, body_json(wrong).await?);

    Ok(())
}

#[tokio::test]
async fn repeated_logins_return_different_tokens() -> Result<()> {
    let (app, _registry) = app();
    let credentials = json!({"email": "dave@example.com", "password": "pw"});
    post_json(&app, REGISTER, &credentials).await?;

    let first = body_json(post_json(&app, LOGIN, &credentials).await?).await?;
    let second = body_json(post_json(&app, LOGIN, &credentials).await?).await?;
    assert_ne!(first["access_token"], second["access_token"]);

    Ok(())
}

#[tokio::test]
async fn ids_increase_per_registration() -> Result<()> {
    let (app, _registry) = app();

    for (index, email) in ["a@example.com", "b@example.com", "c@example.com"]
        .iter()
        .enumerate()
    {
        let response = post_json(&app, REGISTER, &json!({"email": email, "password": "pw"})).await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await?["id"], json!(index + 1));
    }

    Ok(())
}

#[tokio::test]
async fn missing_fields_are_bad_requests() -> Result<()> {
    let (app, registry) = app();

    for (uri, body) in [
        (REGISTER, json!({"email": "alice@example.com"})),
        (REGISTER, json!({"password": "secret"})),
        (REGISTER, json!({"email": "", "password": "secret"})),
        (LOGIN, json!({"email": "alice@example.com", "password": ""})),
        (LOGIN, json!({})),
    ] {
        let response = post_json(&app, uri, &body).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri} {body}");
        assert_eq!(
            body_json(response).await?,
            json!({"error": "email and password required"})
        );
    }

    assert!(registry.is_empty());

    Ok(())
}

#[tokio::test]
async fn malformed_payload_is_bad_request() -> Result<()> {
    let (app, _registry) = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri(REGISTER)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri(LOGIN)
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn whitespace_identity_is_rejected() -> Result<()> {
    let (app, registry) = app();

    let response = post_json(
        &app,
        REGISTER,
        &json!({"email": "alice smith", "password": "secret"}),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await?,
        json!({"error": "Invalid email"})
    );
    assert!(registry.is_empty());

    Ok(())
}

#[tokio::test]
async fn health_reports_build_info() -> Result<()> {
    let (app, _registry) = app();

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let x_app = response
        .headers()
        .get("X-App")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(x_app.starts_with(&format!(
        "{}:{}:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )));

    let body = body_json(response).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/health")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(bytes.is_empty());

    Ok(())
}

#[tokio::test]
async fn request_id_is_generated_and_propagated() -> Result<()> {
    let (app, _registry) = app();

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert_eq!(generated.len(), 26);

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "caller-supplied")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(
        response.headers().get("x-request-id"),
        Some(&HeaderValue::from_static("caller-supplied"))
    );

    Ok(())
}

#[tokio::test]
async fn cors_only_echoes_configured_origin() -> Result<()> {
    let registry = Arc::new(Registry::new());
    let origin = api::frontend_origin("http://localhost:3000/login")?;
    let app = api::app(registry, Some(origin));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(LOGIN)
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(
        response.headers().get("access-control-allow-origin"),
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(LOGIN)
        .header("Origin", "https://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    // only the configured origin is ever echoed back
    let allowed = response.headers().get("access-control-allow-origin");
    assert_eq!(
        allowed,
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );
    assert_ne!(
        allowed,
        Some(&HeaderValue::from_static("https://evil.example"))
    );

    Ok(())
}
