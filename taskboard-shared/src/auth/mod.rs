/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access/refresh tokens
/// - [`middleware`]: Bearer header → [`middleware::AuthContext`]
/// - [`authorization`]: The ownership policy (user → project → task)

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
