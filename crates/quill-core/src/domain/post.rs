use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLISHED" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - a blog post with a cover image.
///
/// The slug is assigned once at creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    /// Comma-separated free-text tags, see [`crate::domain::TagSet`].
    pub tags: String,
    /// Public URL of the cover image.
    pub cover: String,
    pub status: PostStatus,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, published post.
    pub fn new(
        author_id: Uuid,
        slug: String,
        title: String,
        body: String,
        tags: String,
        cover: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug,
            title,
            body,
            tags,
            cover,
            status: PostStatus::Published,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn publish(&mut self) {
        self.set_status(PostStatus::Published);
    }

    pub fn revert_to_draft(&mut self) {
        self.set_status(PostStatus::Draft);
    }

    fn set_status(&mut self, status: PostStatus) {
        self.status = status;
        self.touch();
    }

    /// Apply a partial edit. The slug is left untouched even when the title changes.
    pub fn apply(&mut self, changes: PostChanges) {
        let PostChanges {
            status,
            title,
            tags,
            body,
            cover,
        } = changes;

        if let Some(status) = status {
            self.status = status;
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(body) = body {
            self.body = body;
        }
        if let Some(cover) = cover {
            self.cover = cover;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for a new post submitted by an admin.
#[derive(Debug, Clone)]
pub struct NewPostInput {
    pub title: String,
    pub tags: String,
    pub body: String,
    pub cover: String,
}

/// Partial update of a post. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub status: Option<PostStatus>,
    pub title: Option<String>,
    pub tags: Option<String>,
    pub body: Option<String>,
    pub cover: Option<String>,
}

/// A post together with its author's display name.
#[derive(Debug, Clone)]
pub struct AuthoredPost {
    pub post: Post,
    pub author_name: Option<String>,
}

/// Page selection for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostListQuery {
    pub offset: u64,
    pub limit: u64,
    pub published_only: bool,
}
