// Input validation rules shared by the API handlers and tests

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ValidationError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const POST_CONTENT_MAX_LEN: usize = 300;
pub const COMMENT_CONTENT_MAX_LEN: usize = 128;

lazy_static! {
    // Letters first, then letters, digits, or dashes
    static ref USERNAME_PATTERN: Regex =
        Regex::new("^[A-Za-z][A-Za-z0-9-]*$").expect("username pattern is valid");
}

/// Validate a username: required, 3..=30 chars, ASCII letters, digits, and
/// dashes only, starting with a letter.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::MissingField("username".to_string()));
    }
    if username.len() < USERNAME_MIN_LEN || username.len() > USERNAME_MAX_LEN {
        return Err(ValidationError::InvalidFieldValue {
            field: "username".to_string(),
            reason: format!(
                "length must be between {} and {}",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            ),
        });
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(ValidationError::InvalidFieldValue {
            field: "username".to_string(),
            reason: "must start with a letter and contain only letters, digits, and dashes"
                .to_string(),
        });
    }
    Ok(())
}

/// Validate a password: required, at least 8 chars.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField("password".to_string()));
    }
    if password.len() < PASSWORD_MIN_LEN {
        return Err(ValidationError::InvalidFieldValue {
            field: "password".to_string(),
            reason: format!("must be at least {} characters", PASSWORD_MIN_LEN),
        });
    }
    Ok(())
}

/// Validate post content: required, at most 300 chars.
pub fn validate_post_content(content: &str) -> Result<(), ValidationError> {
    validate_content(content, POST_CONTENT_MAX_LEN)
}

/// Validate comment content: required, at most 128 chars.
pub fn validate_comment_content(content: &str) -> Result<(), ValidationError> {
    validate_content(content, COMMENT_CONTENT_MAX_LEN)
}

fn validate_content(content: &str, max_len: usize) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::MissingField("content".to_string()));
    }
    if content.chars().count() > max_len {
        return Err(ValidationError::InvalidFieldValue {
            field: "content".to_string(),
            reason: format!("must be at most {} characters", max_len),
        });
    }
    Ok(())
}
