//! Domain entities - the core business objects.

mod user;

mod post;
mod slug;
mod tags;

pub use post::{AuthoredPost, NewPostInput, Post, PostChanges, PostListQuery, PostStatus};
pub use slug::slug_candidate;
pub use tags::{TagMatchMode, TagSet};
pub use user::{User, normalize_email};
