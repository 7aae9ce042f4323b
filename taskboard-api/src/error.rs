/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. Library errors convert into
/// [`ApiError`] through `From`, so handlers just use `?`.
///
/// # Response body
///
/// ```json
/// { "error": "validation_error", "message": "Request validation failed",
///   "details": [{ "field": "title", "message": "Title is required" }] }
/// ```
///
/// Ownership failures carry the `not_authorized` code. Their status is 401
/// unless the server is configured for 403 (see
/// [`crate::middleware::authz_status`]).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};
use taskboard_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message for every authentication failure, whatever the cause
pub const UNAUTHENTICATED_MESSAGE: &str = "Not authorized, token failed";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failures (400)
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Missing or bad credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not the owner (401 or 403)
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409), e.g. duplicate email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "not_authorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

/// Response extension marking an ownership failure
///
/// The status policy layer looks for it to apply the configured status.
#[derive(Debug, Clone, Copy)]
pub struct NotAuthorizedMarker;

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotAuthorized => "not_authorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::NotAuthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.error_code().to_string();
        let not_authorized = matches!(self, ApiError::NotAuthorized);

        let (message, details) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None),
            ApiError::ValidationError(errors) => {
                ("Request validation failed".to_string(), Some(errors))
            }
            ApiError::NotAuthorized => ("Not authorized".to_string(), None),
            ApiError::InternalError(msg) => {
                // Logged here, never sent to the client
                tracing::error!(error = %msg, "Internal error");
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error,
            message,
            details,
        });

        let mut response = (status, body).into_response();
        if not_authorized {
            response.extensions_mut().insert(NotAuthorizedMarker);
        }
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => {
                ApiError::Conflict("User already exists".to_string())
            }
            StoreError::MissingReference("project") => {
                ApiError::NotFound("Project not found".to_string())
            }
            other => ApiError::InternalError(format!("Store error: {}", other)),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::ProjectNotFound => ApiError::NotFound("Project not found".to_string()),
            AuthzError::TaskNotFound => ApiError::NotFound("Task not found".to_string()),
            AuthzError::NotAuthorized => ApiError::NotAuthorized,
            AuthzError::Store(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(err) => err.into(),
            reason => {
                tracing::debug!(reason = %reason, "Authentication rejected");
                ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            reason => {
                tracing::debug!(reason = %reason, "Token rejected");
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field)),
                })
            })
            .collect();

        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::ValidationError(vec![
            ValidationErrorDetail::new("title", "Title is required"),
            ValidationErrorDetail::new("status", "Invalid status"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_status_and_code_mapping() {
        assert_eq!(
            ApiError::ValidationError(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotAuthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotAuthorized.error_code(), "not_authorized");
        assert_eq!(
            ApiError::Unauthorized(String::new()).error_code(),
            "unauthorized"
        );
    }

    #[test]
    fn test_not_authorized_response_is_marked() {
        let response = ApiError::NotAuthorized.into_response();
        assert!(response.extensions().get::<NotAuthorizedMarker>().is_some());

        let response = ApiError::NotFound("Task not found".to_string()).into_response();
        assert!(response.extensions().get::<NotAuthorizedMarker>().is_none());
    }

    #[test]
    fn test_authz_error_conversion() {
        assert!(matches!(
            ApiError::from(AuthzError::ProjectNotFound),
            ApiError::NotFound(msg) if msg == "Project not found"
        ));
        assert!(matches!(
            ApiError::from(AuthzError::NotAuthorized),
            ApiError::NotAuthorized
        ));
    }

    #[test]
    fn test_auth_errors_are_uniform() {
        let missing = ApiError::from(AuthError::MissingCredentials);
        let expired = ApiError::from(AuthError::InvalidToken(JwtError::Expired));

        assert_eq!(missing.to_string(), expired.to_string());
        assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let err = ApiError::from(StoreError::DuplicateEmail("a@b.c".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
