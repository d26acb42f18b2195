use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::SignedCookieJar;

use common::models::SessionUser;

use crate::state::AppState;

/// Authentication middleware for protected routes.
///
/// Validates the signed session cookie and inserts the authenticated
/// [`SessionUser`] into request extensions. A missing, tampered, or
/// malformed cookie yields 401.
#[tracing::instrument(skip(state, req, next))]
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Signature verification happens inside the jar; a tampered cookie
    // simply comes back as absent.
    let jar = SignedCookieJar::from_headers(req.headers(), state.cookie_key.clone());

    let cookie = jar
        .get(&state.config.session.cookie_name)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let session_user = SessionUser::decode(cookie.value()).map_err(|e| {
        tracing::warn!(error = %e, "Rejected session cookie with invalid payload");
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(session_user);

    Ok(next.run(req).await)
}
