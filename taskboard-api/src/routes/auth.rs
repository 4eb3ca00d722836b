/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/register` - Create an account and receive a token
/// - `POST /v1/login` - Exchange credentials for a token
/// - `POST /v1/logout` - Revoke the presented token
/// - `GET /v1/me` - The authenticated user
/// - `GET /v1/me/projects` - Projects owned by the authenticated user
/// - `GET /v1/me/tasks` - Tasks assigned to the authenticated user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{JsonBody, QueryParams},
    routes::{created, tasks::TaskListQuery, Envelope},
    validation::{trimmed, Violations},
};
use axum::{extract::State, http::StatusCode, Extension};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        middleware::AuthContext,
        password::{self, HashCost},
    },
    models::{
        project::ProjectDetails,
        task::TaskDetails,
        user::{CreateUser, User},
    },
};
use tracing::{debug, info};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    /// Email address (unique)
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    /// Plaintext password (never trimmed)
    #[serde(default)]
    #[validate(
        length(min = 8, message = "The password field must be at least 8 characters."),
        must_match(
            other = "password_confirmation",
            message = "The password field confirmation does not match."
        )
    )]
    pub password: String,

    #[serde(default)]
    pub password_confirmation: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// Token plus the user it belongs to
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Bearer token for the `Authorization` header
    pub token: String,

    pub user: User,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Runs Argon2 off the async executor
async fn hash_off_thread(plain: String, cost: HashCost) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password_with(&plain, cost))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn verify_off_thread(plain: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/register
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "analytical",
///   "password_confirmation": "analytical"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "message": "User registered successfully",
///   "data": { "token": "eyJ...", "user": { "id": 1, "name": "Ada Lovelace", ... } }
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (including a taken email)
/// - `409 Conflict`: Email taken by a concurrent registration
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Envelope<AuthPayload>)> {
    let mut violations = Violations::of(&req);

    if let Some(email) = req.email.as_deref() {
        if !violations.has("email") && state.store.users.find_by_email(email).await?.is_some() {
            violations.add("email", "The email has already been taken.");
        }
    }
    violations.into_result()?;

    // Both are Some once validation passed
    let (Some(name), Some(email)) = (req.name, req.email) else {
        return Err(ApiError::BadRequest("Missing name or email".to_string()));
    };

    let password_hash = hash_off_thread(req.password, state.hash_cost()).await?;

    let user = state
        .store
        .users
        .create(CreateUser {
            name,
            email,
            password_hash,
        })
        .await?;

    let token = state.issue_token(user.id)?;
    info!(user_id = user.id, "User registered");

    Ok(created(
        "User registered successfully",
        AuthPayload { token, user },
    ))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/login
/// Content-Type: application/json
///
/// { "email": "ada@example.com", "password": "analytical" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing or malformed fields
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Envelope<AuthPayload>> {
    Violations::of(&req).into_result()?;

    let email = req.email.unwrap_or_default();
    let user = state
        .store
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_off_thread(req.password, user.password_hash.clone()).await? {
        debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.issue_token(user.id)?;
    info!(user_id = user.id, "User logged in");

    Ok(Envelope::with_message(
        "Login successful",
        AuthPayload { token, user },
    ))
}

/// Logout endpoint
///
/// Revokes the token that authenticated this request; other tokens of the
/// same user stay valid.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Envelope<()>> {
    state
        .store
        .tokens
        .revoke(auth.token_id, auth.expires_at)
        .await?;

    let purged = state.store.tokens.purge_expired().await?;
    info!(user_id = auth.user_id, token_id = %auth.token_id, purged, "User logged out");

    Ok(Envelope::message("Logged out successfully"))
}

/// The authenticated user
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Envelope<User>> {
    let user = state
        .store
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthenticated.".to_string()))?;

    Ok(Envelope::data(user))
}

/// Projects owned by the authenticated user, newest first
pub async fn my_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Envelope<Vec<ProjectDetails>>> {
    let projects = state.store.projects.list_by_owner(auth.user_id).await?;
    Ok(Envelope::data(projects))
}

/// Tasks assigned to the authenticated user
///
/// Accepts the same `project_id`, `status` and `priority` filters as
/// `GET /v1/tasks`.
pub async fn my_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    QueryParams(query): QueryParams<TaskListQuery>,
) -> ApiResult<Envelope<Vec<TaskDetails>>> {
    let mut filter = query.into_filter()?;
    filter.assigned_to = Some(auth.user_id);

    let tasks = state.store.tasks.list(&filter).await?;
    Ok(Envelope::data(tasks))
}
