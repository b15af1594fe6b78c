use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::slugify;

/// Post entity - a blog post addressed by its slug.
///
/// Unpublished posts exist in storage but are invisible to every read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. The slug is derived from the title when not
    /// supplied by the caller.
    pub fn new(
        author_id: Uuid,
        title: String,
        slug: Option<String>,
        content: String,
        is_published: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        let slug = slug.unwrap_or_else(|| slugify(&title));
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            content,
            is_published,
            published_at: published_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Called on every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_derived_from_title() {
        let post = Post::new(
            Uuid::new_v4(),
            "This is a Test Post With Spaces".to_owned(),
            None,
            "content".to_owned(),
            true,
            None,
        );
        assert_eq!(post.slug, "this-is-a-test-post-with-spaces");
    }

    #[test]
    fn test_explicit_slug_wins() {
        let post = Post::new(
            Uuid::new_v4(),
            "Some Title".to_owned(),
            Some("custom-slug".to_owned()),
            "content".to_owned(),
            false,
            None,
        );
        assert_eq!(post.slug, "custom-slug");
    }

    #[test]
    fn test_touch_advances_updated_at() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "Title".to_owned(),
            None,
            "content".to_owned(),
            false,
            None,
        );
        let before = post.updated_at;
        post.touch();
        assert!(post.updated_at >= before);
    }
}
