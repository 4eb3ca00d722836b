//! Common test utilities for client integration tests
//!
//! Each test gets its own API server on an ephemeral port, backed by the
//! in-process store.

#![allow(dead_code)]

use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{
    ApiConfig, Config, DatabaseConfig, JwtConfig, PasswordConfig, MEMORY_DATABASE_URL,
};
use taskboard_client::{ApiClient, ClientConfig, Session};
use taskboard_shared::repository::Store;

pub const PASSWORD: &str = "correct-horse";

pub struct TestServer {
    pub base_url: String,
    pub store: Store,
}

fn config() -> Config {
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
            secret: "client-test-secret-that-is-at-least-32-bytes".to_string(),
            expiration_hours: 1,
        },
        password: PasswordConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
    }
}

impl TestServer {
    /// Starts a server in the background and returns its `/v1` root
    pub async fn start() -> Self {
        let store = Store::memory();
        let app = build_router(AppState::new(store.clone(), config()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            store,
        }
    }

    /// A client with a fresh, signed-out session
    pub fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(&self.base_url), Arc::new(Session::new())).unwrap()
    }

    /// A client signed in as a newly registered user
    pub async fn signed_in(&self, name: &str, email: &str) -> ApiClient {
        let client = self.client();
        client
            .auth()
            .register(name, email, PASSWORD, PASSWORD)
            .await
            .unwrap();
        client
    }
}

/// `YYYY-MM-DD` for today (UTC) shifted by `days`
pub fn days_from_today(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days)).to_string()
}
