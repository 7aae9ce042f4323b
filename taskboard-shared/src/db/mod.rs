/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded schema migrations
///
/// Row-level queries live next to their types in `models`; the `store`
/// module wraps both behind the `Store` trait.

pub mod migrations;
pub mod pool;
