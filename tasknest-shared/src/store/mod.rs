/// Storage backends
///
/// The API talks to persistence only through the [`Store`] trait, so the
/// same handlers run against Postgres in production and against the
/// in-memory backend in tests and local demos.
///
/// # Backends
///
/// - [`postgres::PgStore`]: sqlx over a `PgPool`, using the model queries
/// - [`memory::MemoryStore`]: maps behind `tokio::sync::RwLock`
///
/// # Example
///
/// ```
/// use tasknest_shared::store::{memory::MemoryStore, UserStore};
/// use tasknest_shared::models::user::CreateUser;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store
///     .create_user(CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
///
/// assert!(store.find_user_by_username("alice").await?.is_some());
/// # let _ = user;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Username is already taken
    #[error("User '{0}' already exists")]
    Conflict(String),

    /// Task owner does not reference an existing user
    #[error("User {0} does not exist")]
    UnknownOwner(Uuid),

    /// Backend failure
    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user
    ///
    /// Fails with [`StoreError::Conflict`] if the username is taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Exact, case-sensitive lookup
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Task store
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task with a store-assigned ID and timestamp
    ///
    /// Fails with [`StoreError::UnknownOwner`] if the owner does not exist.
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Looks a task up regardless of owner
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// All tasks owned by `user_id`, newest first
    async fn list_tasks(&self, user_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Removes a task; returns false if it did not exist
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;
}

/// A complete backend
#[async_trait]
pub trait Store: UserStore + TaskStore {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;
}
