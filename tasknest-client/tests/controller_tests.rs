/// End-to-end tests for the client against a live in-process server
///
/// Each test binds the real router on an ephemeral port over a fresh
/// in-memory store and keeps its session file in a temp directory.

use std::{collections::HashMap, sync::Arc};
use tasknest_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasknest_client::{
    api::ApiClient,
    controller::SessionController,
    session::{Session, SessionStore},
    ClientError,
};
use tasknest_shared::{
    auth::password::PasswordConfig,
    models::task::TaskPriority,
    store::memory::MemoryStore,
};
use tempfile::TempDir;

/// Starts a server and returns its base URL
async fn spawn_server() -> String {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("STORAGE_BACKEND", "memory"),
        ("JWT_SECRET", "test-secret-key-at-least-32-bytes-long"),
    ]);
    let mut config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    config.password = PasswordConfig::insecure_fast();

    let app = build_router(AppState::new(Arc::new(MemoryStore::new()), config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

struct Harness {
    base_url: String,
    dir: TempDir,
}

impl Harness {
    async fn new() -> Self {
        Self {
            base_url: spawn_server().await,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A fresh controller over the shared session file, like a new CLI run
    fn controller(&self) -> SessionController {
        self.controller_with_file("session.json")
    }

    fn controller_with_file(&self, name: &str) -> SessionController {
        let api = ApiClient::new(self.base_url.clone()).unwrap();
        SessionController::start(api, self.store(name)).unwrap()
    }

    fn store(&self, name: &str) -> SessionStore {
        SessionStore::new(self.dir.path().join(name))
    }
}

#[tokio::test]
async fn test_full_flow() {
    let harness = Harness::new().await;
    let mut controller = harness.controller();

    let dashboard = controller.register("alice", "pw1").await.unwrap();
    assert_eq!(dashboard.username, "alice");
    assert!(dashboard.tasks.is_empty());

    let dashboard = controller
        .add_task("Buy milk", Some(TaskPriority::High))
        .await
        .unwrap();
    assert_eq!(dashboard.tasks.len(), 1);
    assert_eq!(dashboard.tasks[0].title, "Buy milk");
    assert_eq!(dashboard.tasks[0].priority, TaskPriority::High);

    let id = dashboard.tasks[0].id.to_string();
    let dashboard = controller.delete_task(&id).await.unwrap();
    assert!(dashboard.tasks.is_empty());
}

#[tokio::test]
async fn test_list_rerenders_newest_first() {
    let harness = Harness::new().await;
    let mut controller = harness.controller();
    controller.register("alice", "pw1").await.unwrap();

    controller.add_task("first", None).await.unwrap();
    let dashboard = controller.add_task("second", None).await.unwrap();

    let titles: Vec<&str> = dashboard.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["second", "first"]);
    assert!(dashboard.tasks.iter().all(|t| t.priority == TaskPriority::Medium));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let harness = Harness::new().await;

    let mut first_run = harness.controller();
    first_run.register("alice", "pw1").await.unwrap();
    first_run.add_task("Persisted", None).await.unwrap();
    drop(first_run);

    let second_run = harness.controller();
    assert!(second_run.is_logged_in());
    assert_eq!(second_run.session().unwrap().username, "alice");

    let dashboard = second_run.dashboard().await.unwrap();
    assert_eq!(dashboard.tasks[0].title, "Persisted");
}

#[tokio::test]
async fn test_login_failure_saves_nothing() {
    let harness = Harness::new().await;
    harness.controller().register("alice", "pw1").await.unwrap();

    let mut controller = harness.controller_with_file("other.json");
    let err = controller.login("alice", "wrong").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Api { status: 400, ref msg, .. } if msg == "Invalid credentials"
    ));
    assert!(!controller.is_logged_in());
    assert_eq!(harness.store("other.json").load().unwrap(), None);
}

#[tokio::test]
async fn test_register_conflict() {
    let harness = Harness::new().await;
    harness.controller().register("alice", "pw1").await.unwrap();

    let err = harness
        .controller_with_file("other.json")
        .register("alice", "pw2")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Api { status: 400, ref msg, .. } if msg == "User already exists"
    ));
}

#[tokio::test]
async fn test_logged_out_actions() {
    let harness = Harness::new().await;
    let controller = harness.controller();

    assert!(!controller.is_logged_in());
    assert!(matches!(
        controller.dashboard().await.unwrap_err(),
        ClientError::NotLoggedIn
    ));
    assert!(matches!(
        controller.add_task("x", None).await.unwrap_err(),
        ClientError::NotLoggedIn
    ));
}

#[tokio::test]
async fn test_logout_clears_session_file() {
    let harness = Harness::new().await;
    let mut controller = harness.controller();
    controller.register("alice", "pw1").await.unwrap();

    controller.logout().unwrap();

    assert!(!controller.is_logged_in());
    assert!(!harness.controller().is_logged_in());
}

#[tokio::test]
async fn test_mutation_errors_are_reported() {
    let harness = Harness::new().await;

    let mut alice = harness.controller_with_file("alice.json");
    alice.register("alice", "pw1").await.unwrap();
    let task_id = alice.add_task("Mine", None).await.unwrap().tasks[0].id.to_string();

    let mut bob = harness.controller_with_file("bob.json");
    bob.register("bob", "pw2").await.unwrap();

    let err = bob.delete_task(&task_id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, ref msg, .. } if msg == "Not authorized"));
    // Bob's session is valid; only this task is off limits
    assert!(!err.is_auth_failure());

    let err = alice.add_task("   ", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, ref msg, .. } if msg == "Title is required"));

    let err = alice.delete_task("no-such-task").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_stale_token_is_an_auth_failure() {
    let harness = Harness::new().await;
    harness
        .store("session.json")
        .save(&Session {
            token: "stale-token".to_string(),
            username: "alice".to_string(),
        })
        .unwrap();

    let controller = harness.controller();
    assert!(controller.is_logged_in());

    let err = controller.dashboard().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Api { status: 400, ref code, ref msg }
            if code.as_deref() == Some("invalid_token") && msg == "Token is not valid"
    ));
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new("http://127.0.0.1:1").unwrap();
    let mut controller =
        SessionController::start(api, SessionStore::new(dir.path().join("s.json"))).unwrap();

    let err = controller.login("alice", "pw1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
