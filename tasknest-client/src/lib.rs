//! # TaskNest Client Library
//!
//! Talks to the TaskNest API on behalf of one user and keeps their session
//! between runs.
//!
//! ## Modules
//!
//! - `api`: Typed HTTP client for the REST endpoints
//! - `controller`: Session controller driving login, listing and mutations
//! - `error`: Client error type
//! - `render`: Plain-text task list rendering
//! - `session`: Session value and its on-disk store

pub mod api;
pub mod controller;
pub mod error;
pub mod render;
pub mod session;

pub use error::{ClientError, ClientResult};
