/// Client session persistence
///
/// A session is the token plus the username it was issued for. It lives in
/// a small JSON file so that a later run starts already logged in.
///
/// # File Location
///
/// `$HOME/.tasknest/session.json` unless overridden; without `HOME` the
/// `.tasknest` directory is created under the working directory.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Directory holding client state
const SESSION_DIR: &str = ".tasknest";

const SESSION_FILE: &str = "session.json";

/// The logged-in user's credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Raw token sent as `x-auth-token`
    pub token: String,

    pub username: String,
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location
    pub fn at_default_path() -> Self {
        Self::new(default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session, if any
    ///
    /// A missing file means logged out. A file that does not parse is
    /// reported as `InvalidData` rather than silently discarded.
    pub fn load(&self) -> io::Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Saves `session`, creating the parent directory if needed
    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut file = open_private(&self.path)?;
        file.write_all(json.as_bytes())?;

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Removes the saved session; a missing file is not an error
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Opens `path` for writing, readable by the owner only
///
/// The mode is also reset on an existing file, which may predate it.
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;

    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// `$HOME/.tasknest/session.json`, or `./.tasknest/session.json` without `HOME`
pub fn default_path() -> PathBuf {
    let base = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(SESSION_DIR).join(SESSION_FILE)
}
