/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Identity token issuing and verification
/// - [`middleware`]: Axum auth gate reading the `x-auth-token` header
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::{hash_password, verify_password, PasswordConfig};
/// use tasknest_shared::auth::jwt::{issue_token, verify_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &PasswordConfig::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let user_id = Uuid::new_v4();
/// let token = issue_token(user_id, "secret-key")?;
/// assert_eq!(verify_token(&token, "secret-key")?, user_id);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
