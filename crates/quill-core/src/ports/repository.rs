use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostListQuery, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key violations surface as [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (already normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Display names for the given user ids. Unknown ids are absent from the map.
    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// One page of posts, newest first.
    async fn list(&self, query: PostListQuery) -> Result<Vec<Post>, RepoError>;

    /// Published posts whose raw tags string contains any of `terms` as a
    /// case-sensitive substring, newest first.
    async fn find_published_with_any_tag(
        &self,
        terms: &[String],
        exclude_slug: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<Post>, RepoError>;
}
