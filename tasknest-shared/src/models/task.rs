/// Task model and database operations
///
/// A task belongs to exactly one user and is never updated in place: it is
/// created, listed, and eventually deleted by its owner.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     priority task_priority NOT NULL DEFAULT 'Medium',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    /// Parses a priority, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown priority '{}' (expected Low, Medium or High)", other)),
        }
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID, assigned by the store
    pub id: Uuid,

    /// Owning user; used only for filtering and ownership checks
    pub user_id: Uuid,

    pub title: String,

    pub priority: TaskPriority,

    /// Creation time, the sort key for listing (newest first)
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub priority: TaskPriority,
}

impl Task {
    /// Checks whether `user_id` owns this task
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Inserts a new task
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if `user_id` does not reference
    /// an existing user.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, priority)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, priority, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, regardless of owner
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, priority, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's tasks, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, priority, created_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes a task by ID
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"High\"");

        let parsed: TaskPriority = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(parsed, TaskPriority::Low);

        // The wire format is exact; only FromStr is lenient
        assert!(serde_json::from_str::<TaskPriority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_priority_from_str_ignores_case() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!("MEDIUM".parse::<TaskPriority>().unwrap(), TaskPriority::Medium);
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_ownership_check() {
        let owner = Uuid::new_v4();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "buy milk".to_string(),
            priority: TaskPriority::High,
            created_at: Utc::now(),
        };

        assert!(task.is_owned_by(owner));
        assert!(!task.is_owned_by(Uuid::new_v4()));
    }
}
