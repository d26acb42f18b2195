// Credential handling: bcrypt hashing and verification against stored users

use crate::db::repositories::user::UserRepository;
use crate::errors::{AuthError, DatabaseError};
use crate::models::User;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

/// Service for registering accounts and validating login credentials
#[derive(Clone)]
pub struct CredentialService {
    user_repository: Arc<UserRepository>,
}

impl CredentialService {
    /// Create a new credential service
    pub fn new(user_repository: UserRepository) -> Self {
        Self {
            user_repository: Arc::new(user_repository),
        }
    }

    /// Register a new account with a bcrypt-hashed password.
    ///
    /// Uniqueness is enforced by the database constraint; a duplicate
    /// username surfaces as [`AuthError::UsernameTaken`].
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            AuthError::HashingFailed(e.to_string())
        })?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        self.user_repository.create(&user).await.map_err(|e| {
            error!(error = %e, username = %username, "Failed to create user");
            match e {
                DatabaseError::DuplicateKey(_) => AuthError::UsernameTaken(username.to_string()),
                _ => AuthError::AuthenticationFailed(format!("Failed to create user: {}", e)),
            }
        })?;

        tracing::info!(user_id = %user.id, username = %username, "User registered");
        Ok(user)
    }

    /// Authenticate a user with username and password.
    ///
    /// Unknown usernames and wrong passwords are distinct errors so the API
    /// can map them to 404 and 401 respectively.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await
            .map_err(|e| {
                error!(error = %e, username = %username, "Database error during login");
                AuthError::AuthenticationFailed(format!("Database error: {}", e))
            })?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        let password_valid = bcrypt::verify(password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            AuthError::AuthenticationFailed(format!("Password verification failed: {}", e))
        })?;

        if !password_valid {
            tracing::warn!(username = %username, "Invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_round_trip() {
        // Low cost keeps the test fast; production uses DEFAULT_COST
        let hash = bcrypt::hash("hunter2-hunter2", 4).expect("hash");
        assert!(bcrypt::verify("hunter2-hunter2", &hash).expect("verify"));
        assert!(!bcrypt::verify("wrong-password", &hash).expect("verify"));
    }
}
