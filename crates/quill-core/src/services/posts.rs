//! Post service - slug assignment, tag lookups and the post lifecycle.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    AuthoredPost, NewPostInput, Post, PostChanges, PostListQuery, TagMatchMode, TagSet,
    slug_candidate,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, UserRepository};

/// Maximum number of posts returned by [`PostService::related_posts`].
pub const RELATED_POSTS_LIMIT: u64 = 3;

/// Page size of the admin listing.
pub const ADMIN_PAGE_SIZE: u64 = 9;

/// Default page size of the public listing.
pub const DEFAULT_PAGE_SIZE: u64 = 9;

/// Upper bound on slug candidates tried for a single post.
pub const MAX_SLUG_ATTEMPTS: u32 = 1000;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    tag_match: TagMatchMode,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            posts,
            users,
            tag_match: TagMatchMode::default(),
        }
    }

    pub fn with_tag_match(mut self, mode: TagMatchMode) -> Self {
        self.tag_match = mode;
        self
    }

    /// Create a published post with a unique slug derived from its title.
    ///
    /// Uniqueness is decided by the store: each candidate is inserted directly and a
    /// unique-constraint violation moves on to the next candidate.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        input: NewPostInput,
    ) -> Result<AuthoredPost, DomainError> {
        let NewPostInput {
            title,
            tags,
            body,
            cover,
        } = input;

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = slug_candidate(&title, attempt);
            let post = Post::new(
                author_id,
                slug.clone(),
                title.clone(),
                body.clone(),
                tags.clone(),
                cover.clone(),
            );

            match self.posts.insert(post).await {
                Ok(saved) => {
                    tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post created");
                    return self.with_author(saved).await;
                }
                Err(RepoError::Constraint(detail)) => {
                    tracing::debug!(%slug, %detail, "Slug already taken, trying next candidate");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::Internal(format!(
            "no free slug for '{title}' after {MAX_SLUG_ATTEMPTS} attempts"
        )))
    }

    /// First slug candidate for `title` that is unused right now.
    ///
    /// Only suitable for previews: another request may claim the slug before it is
    /// inserted. The write path goes through [`PostService::create_post`].
    pub async fn unique_slug(&self, title: &str) -> Result<String, DomainError> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = slug_candidate(title, attempt);
            if self.posts.find_by_slug(&slug).await?.is_none() {
                return Ok(slug);
            }
        }

        Err(DomainError::Internal(format!(
            "no free slug for '{title}' after {MAX_SLUG_ATTEMPTS} attempts"
        )))
    }

    /// Up to [`RELATED_POSTS_LIMIT`] other published posts sharing a tag with `slug`.
    pub async fn related_posts(&self, slug: &str) -> Result<Vec<AuthoredPost>, DomainError> {
        let Some(source) = self.posts.find_by_slug(slug).await? else {
            return Ok(Vec::new());
        };

        let tags = TagSet::parse(&source.tags);
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self
            .find_tagged(&tags, Some(slug), Some(RELATED_POSTS_LIMIT))
            .await?;
        self.with_authors(posts).await
    }

    /// Published posts matching any term of a comma-separated tag filter.
    pub async fn posts_by_tag(
        &self,
        filter: &str,
        limit: Option<u64>,
    ) -> Result<Vec<AuthoredPost>, DomainError> {
        let tags = TagSet::parse(filter);
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self.find_tagged(&tags, None, limit).await?;
        self.with_authors(posts).await
    }

    async fn find_tagged(
        &self,
        tags: &TagSet,
        exclude_slug: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<Post>, DomainError> {
        match self.tag_match {
            TagMatchMode::Substring => Ok(self
                .posts
                .find_published_with_any_tag(tags.terms(), exclude_slug, limit)
                .await?),
            TagMatchMode::Exact => {
                // Substring matches are a superset of exact ones.
                let candidates = self
                    .posts
                    .find_published_with_any_tag(tags.terms(), exclude_slug, None)
                    .await?;
                let cap = limit
                    .and_then(|n| usize::try_from(n).ok())
                    .unwrap_or(usize::MAX);

                Ok(candidates
                    .into_iter()
                    .filter(|post| tags.matches(&post.tags, TagMatchMode::Exact))
                    .take(cap)
                    .collect())
            }
        }
    }

    /// Any post by slug, regardless of status.
    pub async fn get_post(&self, slug: &str) -> Result<AuthoredPost, DomainError> {
        let post = self.find_existing(slug).await?;
        self.with_author(post).await
    }

    /// A published post by slug. Drafts are reported as not found.
    pub async fn get_published_post(&self, slug: &str) -> Result<AuthoredPost, DomainError> {
        match self.posts.find_by_slug(slug).await? {
            Some(post) if post.is_published() => self.with_author(post).await,
            _ => Err(DomainError::post_not_found(slug)),
        }
    }

    /// Admin listing: every post, [`ADMIN_PAGE_SIZE`] per page, newest first.
    pub async fn list_posts(&self, page: i64) -> Result<Vec<AuthoredPost>, DomainError> {
        let query = page_query(page, ADMIN_PAGE_SIZE as i64, false)?;
        let posts = self.posts.list(query).await?;
        self.with_authors(posts).await
    }

    /// Public listing: published posts only, newest first.
    pub async fn list_published_posts(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<Vec<AuthoredPost>, DomainError> {
        let query = page_query(page, limit, true)?;
        let posts = self.posts.list(query).await?;
        self.with_authors(posts).await
    }

    pub async fn edit_post(
        &self,
        slug: &str,
        changes: PostChanges,
    ) -> Result<AuthoredPost, DomainError> {
        let mut post = self.find_existing(slug).await?;
        post.apply(changes);

        let saved = self.posts.update(post).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post edited");
        self.with_author(saved).await
    }

    pub async fn publish_post(&self, slug: &str) -> Result<Post, DomainError> {
        let mut post = self.find_existing(slug).await?;
        post.publish();

        let saved = self.posts.update(post).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post published");
        Ok(saved)
    }

    pub async fn revert_post(&self, slug: &str) -> Result<Post, DomainError> {
        let mut post = self.find_existing(slug).await?;
        post.revert_to_draft();

        let saved = self.posts.update(post).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post reverted to draft");
        Ok(saved)
    }

    pub async fn delete_post(&self, slug: &str) -> Result<(), DomainError> {
        let post = self.find_existing(slug).await?;

        match self.posts.delete(post.id).await {
            Ok(()) => {
                tracing::info!(post_id = %post.id, %slug, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::post_not_found(slug)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_existing(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::post_not_found(slug))
    }

    async fn with_author(&self, post: Post) -> Result<AuthoredPost, DomainError> {
        let mut posts = self.with_authors(vec![post]).await?;
        posts
            .pop()
            .ok_or_else(|| DomainError::Internal("post lost while resolving author".to_string()))
    }

    async fn with_authors(&self, posts: Vec<Post>) -> Result<Vec<AuthoredPost>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names = self.users.find_names(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| AuthoredPost {
                author_name: names.get(&post.author_id).cloned(),
                post,
            })
            .collect())
    }
}

/// Translate a 1-based page number into an offset/limit pair.
fn page_query(page: i64, limit: i64, published_only: bool) -> Result<PostListQuery, DomainError> {
    let out_of_range = || DomainError::Validation("Page does not exist".to_string());
    if page <= 0 || limit <= 0 {
        return Err(out_of_range());
    }

    // Offsets must fit the database's signed 64-bit OFFSET.
    let offset = (page - 1).checked_mul(limit).ok_or_else(out_of_range)?;
    Ok(PostListQuery {
        offset: offset as u64,
        limit: limit as u64,
        published_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostStatus;
    use crate::services::testing::{FakePostRepository, FakeUserRepository};
    use chrono::{Duration, Utc};

    struct Fixture {
        posts: Arc<FakePostRepository>,
        users: Arc<FakeUserRepository>,
        service: PostService,
        author: Uuid,
    }

    fn fixture(mode: TagMatchMode) -> Fixture {
        let posts = Arc::new(FakePostRepository::default());
        let users = Arc::new(FakeUserRepository::default());
        let author = users.add("Ada");
        let service = PostService::new(posts.clone(), users.clone()).with_tag_match(mode);
        Fixture {
            posts,
            users,
            service,
            author,
        }
    }

    fn input(title: &str, tags: &str) -> NewPostInput {
        NewPostInput {
            title: title.to_string(),
            tags: tags.to_string(),
            body: "Body".to_string(),
            cover: "https://cdn.example.com/covers/c.png".to_string(),
        }
    }

    /// Seed a published post created `age_minutes` ago.
    fn seed(f: &Fixture, slug: &str, tags: &str, age_minutes: i64) -> Post {
        let mut post = Post::new(
            f.author,
            slug.to_string(),
            slug.to_string(),
            "Body".to_string(),
            tags.to_string(),
            String::new(),
        );
        post.created_at = Utc::now() - Duration::minutes(age_minutes);
        post.updated_at = post.created_at;
        f.posts.put(post.clone());
        post
    }

    fn slugs(posts: &[AuthoredPost]) -> Vec<&str> {
        posts.iter().map(|p| p.post.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_uses_plain_slug_without_collision() {
        let f = fixture(TagMatchMode::Substring);

        let created = f
            .service
            .create_post(f.author, input("Hello World", "rust"))
            .await
            .unwrap();

        assert_eq!(created.post.slug, "hello-world");
        assert_eq!(created.post.status, PostStatus::Published);
        assert_eq!(created.author_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_identical_titles_get_suffixed_slugs() {
        let f = fixture(TagMatchMode::Substring);

        let first = f
            .service
            .create_post(f.author, input("Hello World", ""))
            .await
            .unwrap();
        let second = f
            .service
            .create_post(f.author, input("Hello World", ""))
            .await
            .unwrap();
        let third = f
            .service
            .create_post(f.author, input("Hello World", ""))
            .await
            .unwrap();

        assert_eq!(first.post.slug, "hello-world");
        assert_eq!(second.post.slug, "hello-world-2");
        assert_eq!(third.post.slug, "hello-world-3");
    }

    #[tokio::test]
    async fn test_create_skips_to_next_free_suffix() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "hello-world", "", 10);
        seed(&f, "hello-world-2", "", 10);

        let created = f
            .service
            .create_post(f.author, input("Hello World", ""))
            .await
            .unwrap();

        assert_eq!(created.post.slug, "hello-world-3");
    }

    #[tokio::test]
    async fn test_unique_slug_preview() {
        let f = fixture(TagMatchMode::Substring);
        assert_eq!(f.service.unique_slug("Hello World").await.unwrap(), "hello-world");

        seed(&f, "hello-world", "", 10);
        assert_eq!(
            f.service.unique_slug("Hello World").await.unwrap(),
            "hello-world-2"
        );
    }

    #[tokio::test]
    async fn test_related_excludes_source_and_caps_newest_first() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "source", "a, b", 100);
        seed(&f, "oldest", "a", 50);
        seed(&f, "older", "b", 40);
        seed(&f, "newer", "x, a", 30);
        seed(&f, "newest", "b", 20);
        seed(&f, "unrelated", "c", 10);

        let related = f.service.related_posts("source").await.unwrap();

        assert_eq!(slugs(&related), vec!["newest", "newer", "older"]);
    }

    #[tokio::test]
    async fn test_related_ignores_drafts() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "source", "a", 100);
        let mut draft = seed(&f, "draft", "a", 10);
        draft.revert_to_draft();
        f.posts.put(draft);

        let related = f.service.related_posts("source").await.unwrap();
        assert!(related.is_empty());
    }

    #[tokio::test]
    async fn test_related_without_tags_or_source_is_empty() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "untagged", " , ", 10);
        seed(&f, "other", "a", 5);

        assert!(f.service.related_posts("untagged").await.unwrap().is_empty());
        assert!(f.service.related_posts("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tag_listing_substring_vs_exact() {
        let substring = fixture(TagMatchMode::Substring);
        seed(&substring, "charts", "chart", 10);
        seed(&substring, "arts", "art, paint", 5);

        let found = substring.service.posts_by_tag("art", None).await.unwrap();
        assert_eq!(slugs(&found), vec!["arts", "charts"]);

        let exact = fixture(TagMatchMode::Exact);
        seed(&exact, "charts", "chart", 10);
        seed(&exact, "arts", "art, paint", 5);

        let found = exact.service.posts_by_tag("art", None).await.unwrap();
        assert_eq!(slugs(&found), vec!["arts"]);
    }

    #[tokio::test]
    async fn test_tag_listing_respects_limit_and_empty_results() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "one", "rust", 30);
        seed(&f, "two", "web", 20);
        seed(&f, "three", "rust", 10);

        let limited = f.service.posts_by_tag("rust, web", Some(2)).await.unwrap();
        assert_eq!(slugs(&limited), vec!["three", "two"]);

        assert!(f.service.posts_by_tag("go", None).await.unwrap().is_empty());
        assert!(f.service.posts_by_tag(" , ", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revert_and_publish_update_timestamp() {
        let f = fixture(TagMatchMode::Substring);
        let seeded = seed(&f, "post", "a", 60);

        let reverted = f.service.revert_post("post").await.unwrap();
        assert_eq!(reverted.status, PostStatus::Draft);
        assert!(reverted.updated_at > seeded.updated_at);

        let published = f.service.publish_post("post").await.unwrap();
        assert_eq!(published.status, PostStatus::Published);
        assert!(published.updated_at >= reverted.updated_at);
    }

    #[tokio::test]
    async fn test_edit_keeps_slug_and_applies_changes() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "post", "a", 60);

        let edited = f
            .service
            .edit_post(
                "post",
                PostChanges {
                    title: Some("Brand New Title".to_string()),
                    status: Some(PostStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.post.slug, "post");
        assert_eq!(edited.post.title, "Brand New Title");
        assert_eq!(edited.post.status, PostStatus::Draft);
        assert_eq!(edited.post.tags, "a");
    }

    #[tokio::test]
    async fn test_missing_post_operations_are_not_found() {
        let f = fixture(TagMatchMode::Substring);

        assert!(matches!(
            f.service.publish_post("nope").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            f.service.delete_post("nope").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            f.service.edit_post("nope", PostChanges::default()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_published_lookup_hides_drafts() {
        let f = fixture(TagMatchMode::Substring);
        let mut draft = seed(&f, "draft", "", 10);
        draft.revert_to_draft();
        f.posts.put(draft);

        assert!(f.service.get_post("draft").await.is_ok());
        assert!(matches!(
            f.service.get_published_post("draft").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_listings_paginate_and_filter() {
        let f = fixture(TagMatchMode::Substring);
        for i in 0..12 {
            seed(&f, &format!("post-{i}"), "", 100 - i);
        }
        let mut draft = seed(&f, "draft", "", 1);
        draft.revert_to_draft();
        f.posts.put(draft);

        let admin_first = f.service.list_posts(1).await.unwrap();
        assert_eq!(admin_first.len(), 9);
        assert_eq!(admin_first[0].post.slug, "draft");

        let admin_second = f.service.list_posts(2).await.unwrap();
        assert_eq!(admin_second.len(), 4);

        let public = f.service.list_published_posts(1, 5).await.unwrap();
        assert_eq!(public.len(), 5);
        assert_eq!(public[0].post.slug, "post-11");
        assert!(public.iter().all(|p| p.post.is_published()));

        assert!(matches!(
            f.service.list_posts(0).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            f.service.list_published_posts(1, 0).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_rejects_page_past_offset_range() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "only", "", 1);

        assert!(matches!(
            f.service.list_published_posts(i64::MAX, 9).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            f.service.list_posts(i64::MAX / 2).await,
            Err(DomainError::Validation(_))
        ));
        // Far but representable pages are simply empty.
        assert!(f.service.list_published_posts(1_000_000, 9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_post() {
        let f = fixture(TagMatchMode::Substring);
        seed(&f, "gone", "", 10);

        f.service.delete_post("gone").await.unwrap();
        assert!(f.posts.find_by_slug("gone").await.unwrap().is_none());
        assert_eq!(f.users.len(), 1);
    }
}
