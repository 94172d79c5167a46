/// Auth gate for Axum
///
/// Reads the raw token from the `x-auth-token` header (no `Bearer` prefix),
/// verifies it, and attaches an [`AuthContext`] to the request extensions.
/// A request that fails any step is answered here and never reaches the
/// handler.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware};
/// use std::sync::Arc;
/// use tasknest_shared::auth::middleware::{token_auth_middleware, AuthContext};
///
/// async fn whoami(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let secret: Arc<str> = Arc::from("secret");
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(secret, token_auth_middleware));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::{verify_token, JwtError};

/// Header carrying the raw token
pub const AUTH_HEADER: &str = "x-auth-token";

/// Identity of the caller, added to request extensions by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route sits behind the gate
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}

/// Error type for the auth gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No token header on the request
    #[error("No token, authorization denied")]
    MissingToken,

    /// Signature, issuer, or structure check failed
    #[error("Token is not valid")]
    InvalidToken,

    /// Token is past its lifetime
    #[error("Token has expired")]
    ExpiredToken,
}

impl AuthError {
    /// HTTP status for this failure
    ///
    /// A missing token is 401; a token that was sent but rejected is 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken | AuthError::ExpiredToken => StatusCode::BAD_REQUEST,
        }
    }

    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.code(),
            "msg": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

/// Resolves the caller from a request's token header
pub fn authenticate(req: &Request, secret: &str) -> Result<AuthContext, AuthError> {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let user_id = verify_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected token");
        AuthError::from(e)
    })?;

    Ok(AuthContext::new(user_id))
}

/// Token auth middleware
///
/// Mount with `axum::middleware::from_fn_with_state(secret, token_auth_middleware)`.
///
/// # Errors
///
/// - 401 if the `x-auth-token` header is missing
/// - 400 if the token is invalid or expired
pub async fn token_auth_middleware(
    State(secret): State<Arc<str>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(&req, &secret)?;

    tracing::debug!(user_id = %auth_context.user_id, "Authenticated request");
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
