//! Client error types

/// Error returned by client calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure: connect, timeout, or an undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// A protected call was made before signup or login
    #[error("Not signed in")]
    NotSignedIn,
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::NotSignedIn => None,
        }
    }

    /// Server error code (`not_found`, `validation_error`, ...)
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True for 404 responses
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = ClientError::Api {
            status: 404,
            code: "not_found".to_string(),
            message: "Task not found".to_string(),
        };

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), Some("not_found"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error 404 (not_found): Task not found");
    }

    #[test]
    fn test_not_signed_in_has_no_status() {
        assert_eq!(ClientError::NotSignedIn.status(), None);
        assert!(!ClientError::NotSignedIn.is_not_found());
    }
}
