use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};

use common::auth::CredentialService;
use common::db::repositories::UserRepository;
use common::errors::AuthError;
use common::models::{SessionUser, User};
use common::validate;

use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::session::{removal_cookie, session_cookie};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

/// Open a session for a freshly authenticated user by adding the signed
/// cookie to the jar.
fn establish_session(
    state: &AppState,
    jar: SignedCookieJar,
    user: &User,
) -> Result<SignedCookieJar, ErrorResponse> {
    let session_user = SessionUser {
        user_id: user.id,
        username: user.username.clone(),
    };

    let cookie = session_cookie(&state.config.session, &session_user).map_err(|e| {
        tracing::error!(error = %e, user_id = %user.id, "Failed to build session cookie");
        ErrorResponse::new("internal_error", "Failed to establish session")
    })?;

    Ok(jar.add(cookie))
}

/// Register endpoint: create an account and open a session
#[tracing::instrument(skip(state, jar, req))]
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(SignedCookieJar, Json<SuccessResponse<UserResponse>>), ErrorResponse> {
    validate::validate_username(&req.username).map_err(ErrorResponse::from)?;
    validate::validate_password(&req.password).map_err(ErrorResponse::from)?;

    let service = CredentialService::new(UserRepository::new(state.db_pool.clone()));

    let user = service
        .register(&req.username, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %req.username, error = %e, "Registration failed");
            match e {
                AuthError::UsernameTaken(_) => {
                    ErrorResponse::new("conflict", "Username already taken")
                }
                _ => ErrorResponse::new("internal_error", "Failed to create user"),
            }
        })?;

    let jar = establish_session(&state, jar, &user)?;

    Ok((jar, Json(SuccessResponse::new(UserResponse::from(user)))))
}

/// Login endpoint: validate credentials and open a session
#[tracing::instrument(skip(state, jar, req))]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(SignedCookieJar, Json<SuccessResponse<UserResponse>>), ErrorResponse> {
    if req.username.is_empty() {
        return Err(ErrorResponse::new(
            "validation_error",
            "Username is required",
        ));
    }
    if req.password.is_empty() {
        return Err(ErrorResponse::new(
            "validation_error",
            "Password is required",
        ));
    }

    let service = CredentialService::new(UserRepository::new(state.db_pool.clone()));

    let user = service
        .login(&req.username, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %req.username, error = %e, "Login failed");
            match e {
                AuthError::UserNotFound(_) => {
                    ErrorResponse::new("not_found", "User does not exist")
                }
                AuthError::InvalidCredentials => {
                    ErrorResponse::new("unauthorized", "Invalid credentials")
                }
                _ => ErrorResponse::new("internal_error", "Authentication failed"),
            }
        })?;

    let jar = establish_session(&state, jar, &user)?;

    Ok((jar, Json(SuccessResponse::new(UserResponse::from(user)))))
}

/// Logout endpoint: clear the session cookie. Succeeds whether or not a
/// session was present.
#[tracing::instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<SuccessResponse<LogoutResponse>>) {
    let jar = jar.remove(removal_cookie(&state.config.session));

    (
        jar,
        Json(SuccessResponse::new(LogoutResponse { logged_out: true })),
    )
}

/// Session check endpoint.
///
/// Reports the session state without requiring authentication. A session
/// whose user has since been deleted is expired on the spot and reported
/// as a conflict.
#[tracing::instrument(skip(state, jar))]
pub async fn check_auth(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let unauthenticated = || {
        Json(SuccessResponse::new(CheckAuthResponse {
            authenticated: false,
            user: None,
        }))
        .into_response()
    };

    let Some(cookie) = jar.get(&state.config.session.cookie_name) else {
        return unauthenticated();
    };

    let session_user = match SessionUser::decode(cookie.value()) {
        Ok(session_user) => session_user,
        Err(e) => {
            tracing::warn!(error = %e, "Session cookie carries invalid payload");
            return unauthenticated();
        }
    };

    let repository = UserRepository::new(state.db_pool.clone());
    match repository.find_by_id(session_user.user_id).await {
        Ok(Some(user)) => Json(SuccessResponse::new(CheckAuthResponse {
            authenticated: true,
            user: Some(UserResponse::from(user)),
        }))
        .into_response(),
        Ok(None) => {
            // The account behind this session is gone; force the client to
            // re-authenticate.
            tracing::info!(user_id = %session_user.user_id, "Expiring session for deleted user");
            let jar = jar.remove(removal_cookie(&state.config.session));
            (
                jar,
                ErrorResponse::new("conflict", "Session user no longer exists"),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to verify session user");
            ErrorResponse::new("internal_error", "Failed to verify session").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{"username": "alice", "password": "hunter2-hunter2"}"#;
        let req: RegisterRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.username, "alice");
        assert_eq!(req.password, "hunter2-hunter2");
    }

    #[test]
    fn test_user_response_from_user() {
        use chrono::Utc;
        use uuid::Uuid;

        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "hashed".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = UserResponse::from(user.clone());
        assert_eq!(response.id, user.id);
        assert_eq!(response.username, user.username);
        assert_eq!(response.created_at, user.created_at);
    }

    #[test]
    fn test_check_auth_response_omits_missing_user() {
        let response = CheckAuthResponse {
            authenticated: false,
            user: None,
        };
        let json = serde_json::to_string(&response).expect("serialize");
        assert!(!json.contains("user"));
    }
}
