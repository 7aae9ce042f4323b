/// Middleware for the API server
///
/// - `auth`: JWT guard for protected routes
/// - `authz_status`: Status policy for ownership failures
/// - `security`: Security response headers

pub mod auth;
pub mod authz_status;
pub mod security;
