/// Postgres store
///
/// Thin adapter from the [`Store`] traits onto the model queries in
/// [`crate::models`]. Constraint violations are mapped to typed store
/// errors; everything else becomes [`StoreError::Database`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, User},
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn database_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let username = data.username.clone();

        User::create(&self.pool, data).await.map_err(|err| {
            let taken = matches!(&err, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
            if taken {
                StoreError::Conflict(username)
            } else {
                database_error(err)
            }
        })
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        User::find_by_username(&self.pool, username)
            .await
            .map_err(database_error)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        User::find_by_id(&self.pool, id).await.map_err(database_error)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let owner = data.user_id;

        Task::create(&self.pool, data).await.map_err(|err| {
            let orphan =
                matches!(&err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation());
            if orphan {
                StoreError::UnknownOwner(owner)
            } else {
                database_error(err)
            }
        })
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Task::find_by_id(&self.pool, id).await.map_err(database_error)
    }

    async fn list_tasks(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        Task::list_by_user(&self.pool, user_id)
            .await
            .map_err(database_error)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Task::delete(&self.pool, id).await.map_err(database_error)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(database_error)
    }
}
