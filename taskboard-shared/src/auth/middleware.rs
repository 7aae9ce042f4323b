/// Request authentication
///
/// Resolves an `Authorization: Bearer <token>` header to an [`AuthContext`].
/// The HTTP layer inserts the context into request extensions; handlers pull
/// it out with Axum's `Extension` extractor.
///
/// Every failure is an [`AuthError`]. The variants exist for logging only:
/// callers must answer all of them with the same rejection.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::middleware::{authenticate, AuthError};
/// use taskboard_shared::store::MemoryStore;
///
/// # async fn example() {
/// let store = MemoryStore::new();
/// let result = authenticate(None, "secret", &store).await;
/// assert!(matches!(result, Err(AuthError::MissingCredentials)));
/// # }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::store::{Store, StoreError};

/// Identity of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Reason a request could not be authenticated
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format")]
    InvalidFormat,

    /// Signature, expiry, issuer or type check failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token names a user that no longer exists
    #[error("Token subject {0} does not exist")]
    UnknownUser(Uuid),

    /// Store lookup failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Extracts the token from a `Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidFormat)?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }

    Ok(token)
}

/// Authenticates a request from its Authorization header
///
/// Validates the access token and confirms its subject still exists.
pub async fn authenticate(
    authorization: Option<&str>,
    secret: &str,
    store: &dyn Store,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(authorization)?;
    let claims = validate_access_token(token, secret)?;

    if store.find_user(claims.sub).await?.is_none() {
        return Err(AuthError::UnknownUser(claims.sub));
    }

    Ok(AuthContext::new(claims.sub))
}
