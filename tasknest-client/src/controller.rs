/// Client session controller
///
/// Owns the current [`Session`] (if any) and drives every user action:
/// authenticate, then fetch and re-render the full task list after each
/// mutation. The session is loaded once at startup and passed along
/// explicitly; there is no global state.
///
/// # Example
///
/// ```no_run
/// use tasknest_client::{api::ApiClient, controller::SessionController, session::SessionStore};
///
/// # async fn example() -> Result<(), tasknest_client::ClientError> {
/// let api = ApiClient::new("http://127.0.0.1:5000")?;
/// let mut controller = SessionController::start(api, SessionStore::at_default_path())?;
///
/// if !controller.is_logged_in() {
///     controller.login("alice", "pw1").await?;
/// }
///
/// let dashboard = controller.add_task("Buy milk", None).await?;
/// print!("{}", dashboard);
/// # Ok(())
/// # }
/// ```

use crate::{
    api::{ApiClient, AuthResponse},
    error::{ClientError, ClientResult},
    render::Dashboard,
    session::{Session, SessionStore},
};
use tasknest_shared::models::task::TaskPriority;

pub struct SessionController {
    api: ApiClient,
    store: SessionStore,
    session: Option<Session>,
}

impl SessionController {
    /// Loads any saved session from `store`
    pub fn start(api: ApiClient, store: SessionStore) -> ClientResult<Self> {
        let session = store.load()?;

        if let Some(session) = &session {
            tracing::debug!(username = %session.username, "Resuming saved session");
        }

        Ok(Self { api, store, session })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Creates an account and logs straight in
    pub async fn register(&mut self, username: &str, password: &str) -> ClientResult<Dashboard> {
        let auth = self.api.register(username, password).await?;
        self.begin(auth)?;
        self.dashboard().await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<Dashboard> {
        let auth = self.api.login(username, password).await?;
        self.begin(auth)?;
        self.dashboard().await
    }

    /// Forgets the session locally; the token itself stays valid until expiry
    pub fn logout(&mut self) -> ClientResult<()> {
        self.store.clear()?;
        self.session = None;
        Ok(())
    }

    /// Fetches the current task list
    ///
    /// Uses the saved token as is; an expired token surfaces as an API error.
    pub async fn dashboard(&self) -> ClientResult<Dashboard> {
        let session = self.require_session()?;
        let tasks = self.api.list_tasks(&session.token).await?;

        Ok(Dashboard {
            username: session.username.clone(),
            tasks,
        })
    }

    pub async fn add_task(
        &self,
        title: &str,
        priority: Option<TaskPriority>,
    ) -> ClientResult<Dashboard> {
        let session = self.require_session()?;
        let task = self.api.create_task(&session.token, title, priority).await?;

        tracing::debug!(task_id = %task.id, "Task added");
        self.dashboard().await
    }

    pub async fn delete_task(&self, id: &str) -> ClientResult<Dashboard> {
        let session = self.require_session()?;
        self.api.delete_task(&session.token, id).await?;

        tracing::debug!(task_id = %id, "Task deleted");
        self.dashboard().await
    }

    fn begin(&mut self, auth: AuthResponse) -> ClientResult<()> {
        let session = Session {
            token: auth.token,
            username: auth.user.username,
        };

        self.store.save(&session)?;
        self.session = Some(session);
        Ok(())
    }

    fn require_session(&self) -> ClientResult<&Session> {
        self.session.as_ref().ok_or(ClientError::NotLoggedIn)
    }
}
