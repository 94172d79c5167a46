/// Plain-text rendering of the task list
///
/// The list is always rendered whole from the latest server response; there
/// is no incremental update.

use std::fmt;
use tasknest_shared::models::task::Task;

/// What the user sees after every successful action
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub username: String,

    /// Newest first, as returned by the server
    pub tasks: Vec<Task>,
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hello, {}", self.username)?;
        f.write_str(&render_tasks(&self.tasks))
    }
}

/// One line per task: id (used by `delete`), title, priority
pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "  No tasks yet.\n".to_string();
    }

    tasks
        .iter()
        .map(|task| format!("  {}  {} ({})\n", task.id, task.title, task.priority))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasknest_shared::models::task::TaskPriority;
    use uuid::Uuid;

    fn task(title: &str, priority: TaskPriority) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            priority,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_tasks(&[]), "  No tasks yet.\n");
    }

    #[test]
    fn test_render_keeps_order() {
        let newer = task("Buy milk", TaskPriority::High);
        let older = task("Walk dog", TaskPriority::Low);

        let out = render_tasks(&[newer.clone(), older.clone()]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("  {}  Buy milk (High)", newer.id));
        assert_eq!(lines[1], format!("  {}  Walk dog (Low)", older.id));
    }

    #[test]
    fn test_dashboard_greets_user() {
        let dashboard = Dashboard {
            username: "alice".to_string(),
            tasks: vec![],
        };
        assert!(dashboard.to_string().starts_with("Hello, alice\n"));
    }
}
