/// Registration form

use crate::client::ApiClient;
use crate::pages::banner;
use crate::session::Route;

#[derive(Debug, Clone)]
pub struct RegisterPage {
    client: ApiClient,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl RegisterPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            submitting: false,
            error: None,
        }
    }

    /// Creates the account, signs in and moves to the project list
    pub async fn submit(&mut self) -> bool {
        self.submitting = true;
        self.error = None;

        let result = self
            .client
            .auth()
            .register(
                &self.name,
                self.email.trim(),
                &self.password,
                &self.password_confirmation,
            )
            .await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                self.password_confirmation.clear();
                self.client.session().navigate(Route::Projects);
                true
            }
            Err(e) => {
                self.error = banner(&e);
                false
            }
        }
    }

    pub fn go_to_login(&self) {
        self.client.session().navigate(Route::Login);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
