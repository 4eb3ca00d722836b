/// Client session
///
/// Holds the bearer token and signed-in user for the lifetime of the
/// process, plus the route the UI is currently showing. Route changes are
/// published on a `watch` channel so a shell can follow them.
///
/// # Example
///
/// ```
/// use taskboard_client::session::{Route, Session};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let session = Session::new();
/// let mut routes = session.subscribe();
///
/// session.expire().await;
/// assert_eq!(*routes.borrow_and_update(), Route::Login);
/// # }
/// ```

use taskboard_shared::models::user::User;
use tokio::sync::{watch, RwLock};

/// Views of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Projects,
    ProjectDetail(i64),
    Tasks,
}

#[derive(Debug, Clone)]
struct Credentials {
    token: String,
    user: User,
}

#[derive(Debug)]
pub struct Session {
    credentials: RwLock<Option<Credentials>>,
    route: watch::Sender<Route>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Signed-out session on the login route
    pub fn new() -> Self {
        let (route, _) = watch::channel(Route::Login);
        Self {
            credentials: RwLock::new(None),
            route,
        }
    }

    /// Stores credentials after login or registration
    pub async fn sign_in(&self, token: String, user: User) {
        tracing::debug!(user_id = user.id, "Session signed in");
        *self.credentials.write().await = Some(Credentials { token, user });
    }

    pub async fn token(&self) -> Option<String> {
        self.credentials.read().await.as_ref().map(|c| c.token.clone())
    }

    pub async fn user(&self) -> Option<User> {
        self.credentials.read().await.as_ref().map(|c| c.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credentials.read().await.is_some()
    }

    /// Forgets the stored credentials
    pub async fn clear(&self) {
        *self.credentials.write().await = None;
    }

    /// Clears credentials and sends the UI back to the login view
    pub async fn expire(&self) {
        tracing::debug!("Session expired");
        self.clear().await;
        self.navigate(Route::Login);
    }

    pub fn navigate(&self, route: Route) {
        self.route.send_replace(route);
    }

    pub fn current_route(&self) -> Route {
        *self.route.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 7,
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_and_clear() {
        let session = Session::new();
        assert!(!session.is_authenticated().await);

        session.sign_in("abc".to_string(), user()).await;
        assert_eq!(session.token().await.as_deref(), Some("abc"));
        assert_eq!(session.user().await.map(|u| u.id), Some(7));

        session.clear().await;
        assert!(session.token().await.is_none());
    }

    #[tokio::test]
    async fn test_expire_routes_to_login() {
        let session = Session::new();
        session.sign_in("abc".to_string(), user()).await;
        session.navigate(Route::Tasks);

        let mut routes = session.subscribe();
        session.expire().await;

        assert!(routes.has_changed().unwrap());
        assert_eq!(*routes.borrow_and_update(), Route::Login);
        assert!(!session.is_authenticated().await);
    }

    #[test]
    fn test_navigate_without_subscribers() {
        let session = Session::new();
        session.navigate(Route::ProjectDetail(3));
        assert_eq!(session.current_route(), Route::ProjectDetail(3));
    }
}
