use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - belongs to exactly one post and is immutable once
/// created. The author is a free-text display name, not a user reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment under a post.
    pub fn new(post_id: Uuid, author: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            content,
            created_at: Utc::now(),
        }
    }
}
