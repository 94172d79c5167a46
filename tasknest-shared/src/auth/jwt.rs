/// Identity tokens
///
/// Tokens are HS256-signed JWTs carrying the user ID as `sub` and a fixed
/// one-hour lifetime. There is no refresh flow and no revocation: a token is
/// valid until it expires.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::jwt::{issue_token, verify_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let token = issue_token(user_id, "your-secret-key")?;
/// assert_eq!(verify_token(&token, "your-secret-key")?, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "tasknest";

/// Token lifetime in seconds
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is past its lifetime
    #[error("Token has expired")]
    Expired,

    /// Bad signature, wrong issuer, or malformed token
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "tasknest"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `user_id` expiring one hour from now
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::seconds(TOKEN_LIFETIME_SECS))
    }

    /// Creates claims with a custom lifetime (negative means already expired)
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp().min(expiration.timestamp()),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh one-hour token for `user_id`
pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id), secret)
}

/// Validates a token and returns its claims
///
/// Checks signature, issuer, `exp` and `nbf` with zero leeway.
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past its lifetime
/// - `JwtError::Invalid` for anything else
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Verifies a token and resolves the user ID it was issued for
pub fn verify_token(token: &str, secret: &str) -> Result<Uuid, JwtError> {
    validate_token(token, secret).map(|claims| claims.sub)
}
