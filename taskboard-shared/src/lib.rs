//! # Taskboard Shared Library
//!
//! Types and business rules shared by the Taskboard API server and client.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects, tasks and their PostgreSQL queries
//! - `store`: The `Store` trait with PostgreSQL and in-memory backends
//! - `auth`: Password hashing, JWTs, request authentication, ownership policy
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
