/// HTTP client for the Taskboard API
///
/// Every request carries the session's bearer token when one is stored. A
/// `401` from any endpoint expires the session (credentials cleared, route
/// switched to login) before the error is returned to the caller.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_client::client::{ApiClient, ClientConfig};
/// use taskboard_client::session::Session;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(ClientConfig::from_env()?, Arc::new(Session::new()))?;
/// let user = client.auth().login("grace@example.com", "secret-password").await?;
/// println!("signed in as {}", user.name);
/// # Ok(())
/// # }
/// ```

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::services::{auth::AuthService, projects::ProjectService, tasks::TaskService};
use crate::session::Session;

/// Default API root when `TASKBOARD_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:8080/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the version prefix, e.g. `http://localhost:8080/v1`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `TASKBOARD_API_URL`: API root (default: `http://localhost:8080/v1`)
    /// - `TASKBOARD_API_TIMEOUT_SECS`: request timeout (default: 30)
    pub fn from_env() -> ClientResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("TASKBOARD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "TASKBOARD_API_URL must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        let timeout = match lookup("TASKBOARD_API_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ClientError::Config(format!("TASKBOARD_API_TIMEOUT_SECS is not a number: '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        })
    }
}

/// Success body returned by the API (`{ data?, message? }`)
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// The payload, or a decode error if the server sent none
    pub fn into_data(self) -> ClientResult<T> {
        self.data
            .ok_or_else(|| ClientError::Decode("response has no data".to_string()))
    }
}

/// Cheap to clone; clones share the connection pool and the session
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.clone())
    }

    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Envelope<T>> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<Envelope<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Envelope<serde_json::Value>> {
        self.send(self.request(Method::DELETE, path)).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<Envelope<T>> {
        let builder = match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("Received 401, expiring session");
            self.session.expire().await;
        }

        if !status.is_success() {
            return Err(ClientError::from_body(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_config_from_vars() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TASKBOARD_API_URL", "https://tasks.example.com/v1"),
            ("TASKBOARD_API_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://tasks.example.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[("TASKBOARD_API_URL", "localhost:8080")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("TASKBOARD_API_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(
            ClientConfig::new("http://localhost:8080/v1/"),
            Arc::new(Session::new()),
        )
        .unwrap();

        assert_eq!(client.url("/projects/3"), "http://localhost:8080/v1/projects/3");
        assert_eq!(client.url("tasks"), "http://localhost:8080/v1/tasks");
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"message": "Task deleted successfully"}"#).unwrap();
        assert_eq!(envelope.message.as_deref(), Some("Task deleted successfully"));
        assert!(envelope.into_data().is_err());
    }
}
