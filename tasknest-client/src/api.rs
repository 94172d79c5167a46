/// HTTP client for the TaskNest API
///
/// # Example
///
/// ```no_run
/// use tasknest_client::api::ApiClient;
///
/// # async fn example() -> Result<(), tasknest_client::ClientError> {
/// let api = ApiClient::new("http://127.0.0.1:5000")?;
///
/// let auth = api.login("alice", "pw1").await?;
/// let tasks = api.list_tasks(&auth.token).await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

use crate::error::{ClientError, ClientResult};
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tasknest_shared::{
    auth::middleware::AUTH_HEADER,
    models::{
        task::{Task, TaskPriority},
        user::PublicUser,
    },
};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Successful register/login body
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    title: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<TaskPriority>,
}

/// Error and message bodies both carry `msg`; only errors carry `error`
#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    error: Option<String>,

    msg: String,
}

/// TaskNest API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tasknest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        let request = self
            .http
            .post(self.url("/register"))
            .json(&CredentialsBody { username, password });

        send(request).await
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        let request = self
            .http
            .post(self.url("/login"))
            .json(&CredentialsBody { username, password });

        send(request).await
    }

    /// The caller's tasks, newest first
    pub async fn list_tasks(&self, token: &str) -> ClientResult<Vec<Task>> {
        let request = self.http.get(self.url("/tasks")).header(AUTH_HEADER, token);
        send(request).await
    }

    /// Creates a task; the server picks Medium when `priority` is `None`
    pub async fn create_task(
        &self,
        token: &str,
        title: &str,
        priority: Option<TaskPriority>,
    ) -> ClientResult<Task> {
        let request = self
            .http
            .post(self.url("/tasks"))
            .header(AUTH_HEADER, token)
            .json(&CreateTaskBody { title, priority });

        send(request).await
    }

    /// Deletes a task and returns the server's confirmation message
    pub async fn delete_task(&self, token: &str, id: &str) -> ClientResult<String> {
        let request = self
            .http
            .delete(self.url(&format!("/tasks/{}", id)))
            .header(AUTH_HEADER, token);

        let body: MessageBody = send(request).await?;
        Ok(body.msg)
    }
}

/// Sends a request and decodes a success body, or turns a failure status
/// into `ClientError::Api`
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let (code, msg) = match serde_json::from_str::<MessageBody>(body) {
        Ok(parsed) => (parsed.error, parsed.msg),
        Err(_) => {
            let text = body.trim();
            let msg = if text.is_empty() {
                status.canonical_reason().unwrap_or("Request failed")
            } else {
                text
            };
            (None, msg.to_string())
        }
    };

    tracing::debug!(status = status.as_u16(), code = ?code, msg = %msg, "API request rejected");

    ClientError::Api {
        status: status.as_u16(),
        code,
        msg,
    }
}
