/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::{AppState, build_router}, config::Config};
/// use taskboard_shared::repository::Store;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Store::memory(), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use taskboard_shared::auth::{
    jwt::{self, Claims, JwtError},
    middleware::authenticate,
    password::HashCost,
};
use taskboard_shared::repository::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Repositories
    pub store: Store,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Argon2id cost for new password hashes
    pub fn hash_cost(&self) -> HashCost {
        self.config.password.into()
    }

    /// Signs a fresh access token for a user
    pub fn issue_token(&self, user_id: i64) -> Result<String, JwtError> {
        let claims = Claims::with_expiration(
            user_id,
            Duration::hours(self.config.jwt.expiration_hours),
        );
        jwt::create_token(&claims, self.jwt_secret())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                      # public
/// └── /v1/
///     ├── POST /register               # public
///     ├── POST /login                  # public
///     ├── POST /logout                 # bearer token
///     ├── GET  /me                     # bearer token
///     ├── GET  /me/projects
///     ├── GET  /me/tasks
///     ├── GET|POST /projects
///     ├── GET|PUT|PATCH|DELETE /projects/:id
///     ├── GET|POST /tasks
///     └── GET|PUT|PATCH|DELETE /tasks/:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, tracing, then bearer-token
/// authentication on the protected group.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/me/projects", get(routes::auth::my_projects))
        .route("/me/tasks", get(routes::auth::my_tasks))
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        // Only matched routes authenticate; unknown paths reach the fallback
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new().merge(public_routes).merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token (including revocation) and injects
/// `AuthContext` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret(), state.store.tokens.as_ref())
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, path = %req.uri().path(), "Rejected request");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
