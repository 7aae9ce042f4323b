/// API route handlers
///
/// - `health`: Liveness and store connectivity
/// - `auth`: Signup, login, token refresh
/// - `projects`: Project CRUD for the caller's projects
/// - `tasks`: Task CRUD scoped through the parent project

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use crate::error::ApiError;

/// Fallback for unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Parses a path identifier; anything that isn't a UUID names nothing
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// Body of a successful delete
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
