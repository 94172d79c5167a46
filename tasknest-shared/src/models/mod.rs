/// Database models for TaskNest
///
/// # Models
///
/// - `user`: User accounts (credential store records)
/// - `task`: Per-user task records
///
/// Each model carries its Postgres queries as associated functions; the
/// backend-neutral interface lives in [`crate::store`].

pub mod task;
pub mod user;
