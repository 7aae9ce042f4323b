/// Authentication endpoints
///
/// - `POST {base}/auth/signup` - Create an account
/// - `POST {base}/auth/login` - Exchange credentials for tokens
/// - `POST {base}/auth/refresh` - Exchange a refresh token for an access token
///
/// Signup and login answer with the same shape:
///
/// ```json
/// {
///   "user": { "id": "uuid", "name": "Ada", "email": "ada@example.com", "createdAt": "..." },
///   "token": "eyJ...",
///   "refreshToken": "eyJ..."
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    validation::trimmed,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::{CreateUser, UserProfile},
};
use tracing::info;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(
        min = 6,
        message = "Please enter a password with 6 or more characters"
    ))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signup and login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub token: String,
}

/// Creates an account and signs it in
///
/// # Errors
///
/// - `400`: Validation failed
/// - `409`: Email already registered
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    // Before hashing: a duplicate should not cost an Argon2 run
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // Concurrent signups with one email are settled by the unique index
    let user = state
        .store
        .create_user(CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await?;

    let tokens = jwt::issue_token_pair(user.id, state.jwt_secret())?;

    info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.profile(),
            token: tokens.token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// Verifies credentials and issues tokens
///
/// An unknown email and a wrong password get the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let tokens = jwt::issue_token_pair(user.id, state.jwt_secret())?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user.profile(),
        token: tokens.token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Exchanges a refresh token for a new access token
///
/// The subject must still exist.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    if state.store.find_user(claims.sub).await?.is_none() {
        tracing::debug!(user_id = %claims.sub, "Refresh rejected: unknown user");
        return Err(ApiError::Unauthorized("Invalid or expired token".to_string()));
    }

    let token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { token }))
}
