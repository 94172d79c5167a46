/// In-memory store
///
/// Holds everything in process memory; contents are lost on restart.
/// Username uniqueness is checked and recorded under a single write lock,
/// so concurrent registrations of the same name cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    task::{CreateTask, Task},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,

    // Insertion order, oldest first
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict(data.username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        if !self.users.read().await.contains_key(&data.user_id) {
            return Err(StoreError::UnknownOwner(data.user_id));
        }

        let task = Task {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            priority: data.priority,
            created_at: Utc::now(),
        };
        self.tasks.write().await.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        // Reverse first so equal timestamps keep newest-inserted first
        let mut owned: Vec<Task> = tasks
            .iter()
            .rev()
            .filter(|t| t.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        Ok(tasks.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
