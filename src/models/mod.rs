/// Data models for post-service
///
/// A `Post` is the aggregate root: likes and comments live embedded inside
/// the post document and have no lifecycle of their own. The whole value is
/// what gets persisted and overwritten on every mutation.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like entity - represents a user liking a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Comment entity - represents a comment embedded in a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

/// Post aggregate root
///
/// `user_id` and `date` are set at creation and never change afterwards.
/// `name` and `avatar` are display metadata captured from the author at
/// creation time, not authoritative user data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Build a fresh post owned by `user_id` with empty likes and comments.
    pub fn new(user_id: Uuid, text: String, name: String, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            text,
            name,
            avatar,
            date: Utc::now(),
            likes: Vec::new(),
            comments: Vec::new(),
        }
    }
}
