/// Client error type
///
/// Every client operation returns `ClientResult<T>`; nothing is swallowed.

/// Server error codes meaning the token was missing or rejected
const TOKEN_ERROR_CODES: [&str; 3] = ["missing_token", "invalid_token", "expired_token"];

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{msg} (HTTP {status})")]
    Api {
        status: u16,

        /// Machine-readable `error` field, when the server sent one
        code: Option<String>,

        msg: String,
    },

    /// The request never got a response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not what the endpoint promises
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The operation needs a session and there is none
    #[error("Not logged in; run `tasknest login` first")]
    NotLoggedIn,

    /// Reading or writing the session file failed
    #[error("Session file error: {0}")]
    Session(#[from] std::io::Error),
}

impl ClientError {
    /// True when the session itself is unusable: no token, or a token the
    /// server refused
    ///
    /// A valid session refused for a specific task (`unauthorized`) is not
    /// an auth failure.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ClientError::Api {
                code: Some(code), ..
            } => TOKEN_ERROR_CODES.contains(&code.as_str()),
            ClientError::NotLoggedIn => true,
            _ => false,
        }
    }
}
