//! In-memory repositories - used as fallback when no database is configured.
//!
//! Data is lost on process restart. Unique keys (post slug, user email) are checked
//! under the write lock, so concurrent inserts cannot both claim the same key.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, PostListQuery, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

/// In-memory post store keyed by id.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All posts matching `keep`, newest first.
    async fn newest_first(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.values().filter(|p| keep(p)).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint(format!(
                "posts.slug '{}' already exists",
                post.slug
            )));
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, query: PostListQuery) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .newest_first(|p| !query.published_only || p.is_published())
            .await;

        Ok(posts
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn find_published_with_any_tag(
        &self,
        terms: &[String],
        exclude_slug: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .newest_first(|p| {
                p.is_published()
                    && exclude_slug != Some(p.slug.as_str())
                    && terms.iter().any(|t| p.tags.contains(t.as_str()))
            })
            .await;

        let cap = limit
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX);
        Ok(posts.into_iter().take(cap).collect())
    }
}

/// In-memory user store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users.email already exists".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| store.get(id).map(|u| (*id, u.name.clone())))
            .collect())
    }
}
