/// Database layer
///
/// - `pool`: Postgres connection pool with a startup health check
/// - `migrations`: Embedded schema migrations
///
/// Models and their queries are in [`crate::models`]; the backend-neutral
/// interface is [`crate::store`].

pub mod migrations;
pub mod pool;
