/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations
///
/// The entity store built on top of the pool lives in [`crate::store`].

pub mod migrations;
pub mod pool;
