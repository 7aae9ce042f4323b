/// Status policy for ownership failures
///
/// Handlers answer ownership failures with [`ApiError::NotAuthorized`], which
/// renders as 401 and tags the response with [`NotAuthorizedMarker`]. This
/// layer rewrites tagged responses to the configured status, so switching to
/// 403 is a deployment setting rather than a code change.
///
/// [`ApiError::NotAuthorized`]: crate::error::ApiError::NotAuthorized

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{app::AppState, error::NotAuthorizedMarker};

pub async fn not_authorized_status(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    if response.extensions().get::<NotAuthorizedMarker>().is_some() {
        *response.status_mut() = state.config.forbidden_status();
    }

    response
}
