/// Integration tests for authentication endpoints
///
/// Covers registration, login, logout/revocation, the caller's own
/// resources and the unauthenticated surface (health, fallback).

mod common;

use axum::http::{Method, StatusCode};
use common::{TestContext, PASSWORD};
use serde_json::json;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "password": "analytical",
        "password_confirmation": "analytical",
    })
}

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let ctx = TestContext::new();

    let response = ctx
        .send(Method::POST, "/v1/register", None, Some(registration("ada@example.com")))
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["data"]["user"]["email"], "ada@example.com");
    assert!(response.body["data"]["user"].get("password_hash").is_none());

    let token = response.body["data"]["token"].as_str().unwrap().to_string();
    let me = ctx.get("/v1/me", &token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_register_validation_lists_every_field() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Method::POST,
            "/v1/register",
            None,
            Some(json!({
                "name": "  ",
                "email": "not-an-email",
                "password": "short",
                "password_confirmation": "different",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "validation_error");

    let fields = response.error_fields();
    assert!(fields.contains(&"name".to_string()));
    assert!(fields.contains(&"email".to_string()));
    assert!(fields.contains(&"password".to_string()));
}

#[tokio::test]
async fn test_register_rejects_taken_email_case_insensitively() {
    let ctx = TestContext::new();
    ctx.create_user("Existing", "ada@example.com").await;

    let response = ctx
        .send(Method::POST, "/v1/register", None, Some(registration("ADA@example.com")))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["email".to_string()]);
    assert_eq!(response.body["message"], "The email has already been taken.");
}

#[tokio::test]
async fn test_login() {
    let ctx = TestContext::new();
    ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx
        .send(
            Method::POST,
            "/v1/login",
            None,
            Some(json!({ "email": "grace@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert!(response.body["data"]["token"].is_string());
    assert_eq!(response.body["data"]["user"]["name"], "Grace");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let ctx = TestContext::new();
    ctx.create_user("Grace", "grace@example.com").await;

    let wrong_password = ctx
        .send(
            Method::POST,
            "/v1/login",
            None,
            Some(json!({ "email": "grace@example.com", "password": "wrong-password" })),
        )
        .await;
    let unknown_email = ctx
        .send(
            Method::POST,
            "/v1/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        )
        .await;

    for response in [wrong_password, unknown_email] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_login_requires_fields() {
    let ctx = TestContext::new();

    let response = ctx
        .send(Method::POST, "/v1/login", None, Some(json!({})))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.error_fields(),
        vec!["email".to_string(), "password".to_string()]
    );
}

#[tokio::test]
async fn test_logout_revokes_only_that_token() {
    let ctx = TestContext::new();
    let (user, token) = ctx.create_user("Grace", "grace@example.com").await;
    let other_token = ctx.token_for(user.id);

    let response = ctx
        .send(Method::POST, "/v1/logout", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out successfully");

    let revoked = ctx.get("/v1/me", &token).await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);
    assert_eq!(revoked.body["message"], "Token has been revoked");

    let still_valid = ctx.get("/v1/me", &other_token).await;
    assert_eq!(still_valid.status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();

    let missing = ctx.send(Method::GET, "/v1/projects", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["message"], "Unauthenticated.");

    let garbage = ctx.get("/v1/projects", "not-a-jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let ctx = TestContext::new();
    let (user, _) = ctx.create_user("Grace", "grace@example.com").await;

    let forged = taskboard_shared::auth::jwt::create_token(
        &taskboard_shared::auth::jwt::Claims::new(user.id),
        "a-completely-different-secret-of-32-bytes",
    )
    .unwrap();

    let response = ctx.get("/v1/me", &forged).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_my_projects_and_tasks() {
    let ctx = TestContext::new();
    let (grace, grace_token) = ctx.create_user("Grace", "grace@example.com").await;
    let (alan, alan_token) = ctx.create_user("Alan", "alan@example.com").await;

    let graces = ctx.create_project(&grace_token, "Compiler").await;
    ctx.create_project(&alan_token, "Enigma").await;

    ctx.create_task(&grace_token, graces, alan.id, json!({ "priority": "high" }))
        .await;
    ctx.create_task(&grace_token, graces, alan.id, json!({ "priority": "low" }))
        .await;
    ctx.create_task(&grace_token, graces, grace.id, json!({})).await;

    let projects = ctx.get("/v1/me/projects", &grace_token).await;
    assert_eq!(projects.status, StatusCode::OK);
    let projects = projects.body["data"].as_array().unwrap().clone();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Compiler");

    let tasks = ctx.get("/v1/me/tasks", &alan_token).await;
    assert_eq!(tasks.body["data"].as_array().unwrap().len(), 2);

    let high = ctx.get("/v1/me/tasks?priority=high", &alan_token).await;
    let high = high.body["data"].as_array().unwrap().clone();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0]["assignee"]["id"], alan.id);
}

#[tokio::test]
async fn test_health_reports_store() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["store"], "memory");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/v1/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "not_found");
    assert_eq!(
        response.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx.send_raw(Method::POST, "/v1/projects", &token, "{\"name\": ").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "bad_request");
}
