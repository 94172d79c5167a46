/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every failure becomes one `ApiError`
/// kind, which renders as a status code plus a JSON body:
///
/// ```json
/// { "error": "conflict", "msg": "User already exists" }
/// ```
///
/// Credential problems are 400, auth problems 401 (or 400 for a token that
/// was sent but rejected), missing resources 404, and anything unexpected
/// 500 with the detail logged rather than returned.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tasknest_shared::{
    auth::{jwt::JwtError, middleware::AuthError, password::PasswordError},
    store::StoreError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or unacceptable input (400)
    BadRequest(String),

    /// Username already registered (400)
    Conflict(String),

    /// Login for a username that does not exist (400)
    UnknownUser(String),

    /// Password mismatch (400)
    InvalidCredentials(String),

    /// Caller is not allowed to touch the resource (401)
    Unauthorized(String),

    /// Token missing, invalid, or expired (401 or 400)
    Token(AuthError),

    /// Resource does not exist (404)
    NotFound(String),

    /// Anything unexpected (500)
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. "not_found"
    pub error: String,

    /// Human-readable message
    pub msg: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::Conflict(_)
            | ApiError::UnknownUser(_)
            | ApiError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Token(err) => err.status_code(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::UnknownUser(_) => "unknown_user",
            ApiError::InvalidCredentials(_) => "invalid_credentials",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Token(err) => err.code(),
            ApiError::NotFound(_) => "not_found",
            ApiError::InternalError(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::UnknownUser(msg) => write!(f, "Unknown user: {}", msg),
            ApiError::InvalidCredentials(msg) => write!(f, "Invalid credentials: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Token(err) => write!(f, "Token rejected: {}", err),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.code().to_string();

        let msg = match self {
            ApiError::InternalError(detail) => {
                // Never expose internals to clients
                tracing::error!("Internal error: {}", detail);
                "Server error".to_string()
            }
            ApiError::Token(err) => err.to_string(),
            ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::UnknownUser(msg)
            | ApiError::InvalidCredentials(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg) => msg,
        };

        (status, Json(ErrorResponse { error, msg })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::Conflict("User already exists".to_string()),
            // Token outlived its user, e.g. after an in-memory store restart
            StoreError::UnknownOwner(_) => {
                ApiError::Unauthorized("User no longer exists".to_string())
            }
            StoreError::Database(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Token(err)
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            other => ApiError::Token(AuthError::from(other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Conflict(String::new()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnknownUser(String::new()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidCredentials(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized(String::new()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound(String::new()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Token(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Token(AuthError::ExpiredToken).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_body_carries_msg() {
        let (status, json) = body_json(ApiError::NotFound("Task not found".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["msg"], "Task not found");
    }

    #[tokio::test]
    async fn test_internal_error_is_masked() {
        let (status, json) =
            body_json(ApiError::InternalError("connection refused on 10.0.0.3".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["msg"], "Server error");
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ApiError::from(StoreError::Conflict("alice".to_string())),
            ApiError::Conflict(msg) if msg == "User already exists"
        ));
        assert!(matches!(
            ApiError::from(StoreError::Database("boom".to_string())),
            ApiError::InternalError(_)
        ));
    }

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(
            ApiError::from(JwtError::Expired),
            ApiError::Token(AuthError::ExpiredToken)
        ));
        assert!(matches!(
            ApiError::from(JwtError::CreateError("x".to_string())),
            ApiError::InternalError(_)
        ));
    }
}
