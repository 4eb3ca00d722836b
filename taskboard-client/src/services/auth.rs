/// Authentication calls
///
/// Successful register/login store the token and user in the session;
/// logout always forgets them, even if the server call fails.

use serde::{Deserialize, Serialize};
use taskboard_shared::models::user::User;

use crate::client::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    token: String,
    user: User,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ClientResult<User> {
        let payload: AuthPayload = self
            .client
            .post(
                "/register",
                &RegisterBody {
                    name,
                    email,
                    password,
                    password_confirmation,
                },
            )
            .await?
            .into_data()?;

        Ok(self.remember(payload).await)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let payload: AuthPayload = self
            .client
            .post("/login", &LoginBody { email, password })
            .await?
            .into_data()?;

        Ok(self.remember(payload).await)
    }

    /// Revokes the token server-side and clears the session
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .client
            .post::<serde_json::Value, _>("/logout", &serde_json::json!({}))
            .await;
        self.client.session().clear().await;

        result.map(|_| ())
    }

    /// The signed-in user as the server sees it
    pub async fn me(&self) -> ClientResult<User> {
        self.client.get("/me").await?.into_data()
    }

    async fn remember(&self, payload: AuthPayload) -> User {
        self.client
            .session()
            .sign_in(payload.token, payload.user.clone())
            .await;
        payload.user
    }
}
