/// Request authentication
///
/// Turns the `Authorization: Bearer <token>` header of a request into an
/// [`AuthContext`]. A token authenticates only if it verifies (signature,
/// issuer, expiry) AND its `jti` has not been revoked by a logout.
///
/// The API's router layer calls [`authenticate`] and inserts the resulting
/// context into request extensions, where handlers pick it up:
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::repository::{StoreError, TokenRepository};

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// ID (`jti`) of the token presented with the request
    pub token_id: Uuid,

    /// When the presented token expires
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            token_id: claims.jti,
            expires_at: claims.expires_at(),
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header is not a bearer token
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token failed verification
    #[error("{0}")]
    InvalidToken(String),

    /// Token was revoked by a logout
    #[error("Token has been revoked")]
    Revoked,

    /// Revocation lookup failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            e => AuthError::InvalidToken(format!("Invalid token: {}", e)),
        }
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` / `InvalidFormat` for a missing or malformed header
/// - `AuthError::InvalidToken` if the token fails verification
/// - `AuthError::Revoked` if the token was logged out
/// - `AuthError::Store` if the revocation lookup fails
pub async fn authenticate(
    headers: &HeaderMap,
    secret: &str,
    tokens: &dyn TokenRepository,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    if tokens.is_revoked(claims.jti).await? {
        debug!(user_id = claims.sub, token_id = %claims.jti, "Rejected revoked token");
        return Err(AuthError::Revoked);
    }

    Ok(AuthContext::from_claims(&claims))
}
