/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Create an account and get a token
/// - `POST /api/login` - Exchange credentials for a token
///
/// Both answer with the same shape, so a client can treat a fresh
/// registration exactly like a login.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, PublicUser},
    store::UserStore,
};

/// Credentials sent to register and login
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token plus the public view of the user it was issued for
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed token, valid for one hour
    pub token: String,

    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw1" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "uuid", "username": "alice" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Username already taken, or malformed body
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;

    // Best-effort check; the store enforces uniqueness again on insert
    if state
        .store
        .find_user_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let config = *state.password_config();
    let plaintext = req.password;
    let password_hash =
        run_blocking(move || password::hash_password(&plaintext, &config)).await??;

    let user = state
        .store
        .create_user(CreateUser {
            username: req.username,
            password_hash,
        })
        .await?;

    let token = jwt::issue_token(user.id, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// Login with username and password
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw1" }
/// ```
///
/// # Response
///
/// Same as [`register`].
///
/// # Errors
///
/// - `400 Bad Request`: Unknown username ("User does not exist") or wrong
///   password ("Invalid credentials")
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;

    let user = state
        .store
        .find_user_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::UnknownUser("User does not exist".to_string()))?;

    let plaintext = req.password;
    let hash = user.password_hash.clone();
    let is_valid = run_blocking(move || password::verify_password(&plaintext, &hash)).await??;

    if !is_valid {
        tracing::debug!(username = %user.username, "Password mismatch");
        return Err(ApiError::InvalidCredentials("Invalid credentials".to_string()));
    }

    let token = jwt::issue_token(user.id, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// Runs CPU-bound hashing off the async workers
async fn run_blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))
}
