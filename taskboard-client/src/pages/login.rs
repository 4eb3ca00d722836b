/// Login form

use crate::client::ApiClient;
use crate::pages::banner;
use crate::session::Route;

#[derive(Debug, Clone)]
pub struct LoginPage {
    client: ApiClient,
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl LoginPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            email: String::new(),
            password: String::new(),
            submitting: false,
            error: None,
        }
    }

    /// Signs in and moves to the project list
    ///
    /// Returns whether the login succeeded.
    pub async fn submit(&mut self) -> bool {
        self.submitting = true;
        self.error = None;

        let result = self.client.auth().login(self.email.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                self.client.session().navigate(Route::Projects);
                true
            }
            Err(e) => {
                self.error = banner(&e);
                false
            }
        }
    }

    pub fn go_to_register(&self) {
        self.client.session().navigate(Route::Register);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
