//! # TaskNest Shared Library
//!
//! Types and logic shared by the TaskNest API server and its client.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, identity tokens, and the request auth gate
//! - `models`: User and task records
//! - `store`: Storage traits with Postgres and in-memory backends
//! - `db`: Postgres pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
