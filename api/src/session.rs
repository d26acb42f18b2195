// Session cookie construction and removal

use axum_extra::extract::cookie::{Cookie, SameSite};

use common::config::SessionConfig;
use common::errors::SessionError;
use common::models::SessionUser;

/// Build the signed session cookie for an authenticated user.
pub fn session_cookie(
    config: &SessionConfig,
    user: &SessionUser,
) -> Result<Cookie<'static>, SessionError> {
    let value = user.encode()?;

    Ok(Cookie::build((config.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(config.max_age_days))
        .build())
}

/// Build the cookie used to clear a session. Name and path must match the
/// original cookie for browsers to drop it.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .build()
}
