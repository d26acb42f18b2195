use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;

// ============================================================================
// Entity Models
// ============================================================================

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A short post shown in the feed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment under a post. `user_id` is nullable: comments outlive
/// deleted accounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Read Projections
// ============================================================================

/// Feed row: a post joined with its author's username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Discussion row: a comment joined with its author's username, when the
/// author still exists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiscussionComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Discriminator for rows in the activity view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Post,
    Comment,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Post => write!(f, "post"),
            ActivityKind::Comment => write!(f, "comment"),
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ActivityKind::Post),
            "comment" => Ok(ActivityKind::Comment),
            other => Err(format!("Unknown activity kind: {}", other)),
        }
    }
}

/// One row of a user's activity history: a post they wrote or a comment
/// they left. `post_id` is the parent post for comments, `None` for posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub post_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Sessions
// ============================================================================

/// Authenticated identity carried in the signed session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub username: String,
}

// ============================================================================
// Pagination
// ============================================================================

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Validated pagination window for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    /// Build a page from raw query parameters. Missing values fall back to
    /// defaults, negative offsets and non-positive limits are rejected, and
    /// oversized limits are clamped to [`MAX_PAGE_LIMIT`].
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationError> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "offset".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if limit < 1 {
            return Err(ValidationError::InvalidFieldValue {
                field: "limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            offset,
            limit: limit.min(MAX_PAGE_LIMIT),
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None).expect("defaults should be valid");
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_rejects_negative_offset() {
        assert!(Page::new(Some(-1), None).is_err());
    }

    #[test]
    fn test_page_rejects_nonpositive_limit() {
        assert!(Page::new(None, Some(0)).is_err());
        assert!(Page::new(None, Some(-5)).is_err());
    }

    #[test]
    fn test_page_clamps_oversized_limit() {
        let page = Page::new(None, Some(10_000)).expect("oversized limit should clamp");
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_activity_kind_round_trip() {
        for kind in [ActivityKind::Post, ActivityKind::Comment] {
            let parsed: ActivityKind = kind.to_string().parse().expect("round trip");
            assert_eq!(parsed, kind);
        }
        assert!("like".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn test_activity_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ActivityKind::Post).expect("serialize");
        assert_eq!(json, r#""post""#);
    }

    #[test]
    fn test_user_password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "secret-hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).expect("serialize");
        assert!(!json.contains("secret-hash"));
    }
}
