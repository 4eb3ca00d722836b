//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-process store and router per test (no external services)
//! - Test user creation with a cheap password hash
//! - JWT token generation
//! - Request helpers returning status plus parsed JSON body

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{
    ApiConfig, Config, DatabaseConfig, JwtConfig, PasswordConfig, MEMORY_DATABASE_URL,
};
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::{hash_password_with, HashCost};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::repository::Store;
use tower::Service as _;

pub const PASSWORD: &str = "correct-horse";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Store,
    pub app: Router,
    pub config: Config,
}

/// Status and JSON body of a response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Fields named in a 422 `details` list
    pub fn error_fields(&self) -> Vec<String> {
        self.body["details"]
            .as_array()
            .map(|details| {
                details
                    .iter()
                    .filter_map(|d| d["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: MEMORY_DATABASE_URL.to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-that-is-at-least-32-bytes-long".to_string(),
            expiration_hours: 1,
        },
        password: PasswordConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
    }
}

impl TestContext {
    /// Creates a new test context over an empty in-process store
    pub fn new() -> Self {
        let store = Store::memory();
        let config = test_config();
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self { store, app, config }
    }

    /// Inserts a user directly and signs a token for it
    pub async fn create_user(&self, name: &str, email: &str) -> (User, String) {
        let password_hash = hash_password_with(PASSWORD, HashCost::minimal()).unwrap();
        let user = self
            .store
            .users
            .create(CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .unwrap();

        let token = self.token_for(user.id);
        (user, token)
    }

    pub fn token_for(&self, user_id: i64) -> String {
        create_token(&Claims::new(user_id), &self.config.jwt.secret).unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.dispatch(builder.body(body).unwrap()).await
    }

    /// Sends a JSON request whose body is passed through untouched
    pub async fn send_raw(&self, method: Method, uri: &str, token: &str, raw: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a project through the API and returns its id
    pub async fn create_project(&self, token: &str, name: &str) -> i64 {
        let response = self
            .post("/v1/projects", token, json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_i64().unwrap()
    }

    /// Creates a task through the API and returns its id
    pub async fn create_task(
        &self,
        token: &str,
        project_id: i64,
        assigned_to: i64,
        overrides: Value,
    ) -> i64 {
        let mut body = json!({
            "project_id": project_id,
            "title": "Task",
            "priority": "medium",
            "due_date": days_from_today(1),
            "assigned_to": assigned_to,
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
            for (key, value) in extra {
                target.insert(key.clone(), value.clone());
            }
        }

        let response = self.post("/v1/tasks", token, body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_i64().unwrap()
    }
}

/// `YYYY-MM-DD` for today (UTC) shifted by `days`
pub fn days_from_today(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days)).to_string()
}
