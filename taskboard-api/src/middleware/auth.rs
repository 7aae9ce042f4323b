/// JWT guard for protected routes
///
/// Resolves the `Authorization: Bearer` header to an [`AuthContext`] and
/// inserts it into request extensions. Handlers read it with
/// `Extension<AuthContext>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use taskboard_shared::auth::middleware::{authenticate, AuthContext};

use crate::{app::AppState, error::ApiError};

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth_context: AuthContext =
        authenticate(header, state.jwt_secret(), state.store.as_ref()).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
