//! Hand-rolled repository fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostListQuery, User};
use crate::error::RepoError;
use crate::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
pub struct FakePostRepository {
    posts: Mutex<Vec<Post>>,
}

impl FakePostRepository {
    /// Insert or replace a post without any constraint checks.
    pub fn put(&self, post: Post) {
        let mut posts = self.posts.lock().unwrap();
        posts.retain(|p| p.id != post.id);
        posts.push(post);
    }

    fn newest_first(&self) -> Vec<Post> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakePostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint(format!("slug '{}' exists", post.slug)));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn list(&self, query: PostListQuery) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|p| !query.published_only || p.is_published())
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn find_published_with_any_tag(
        &self,
        terms: &[String],
        exclude_slug: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|p| p.is_published())
            .filter(|p| exclude_slug != Some(p.slug.as_str()))
            .filter(|p| terms.iter().any(|t| p.tags.contains(t.as_str())))
            .take(limit.map_or(usize::MAX, |n| n as usize))
            .collect())
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<Vec<User>>,
}

impl FakeUserRepository {
    /// Add a user with a placeholder hash and return its id.
    pub fn add(&self, name: &str) -> Uuid {
        let user = User::new(
            name.to_string(),
            &format!("{}@example.com", name.to_lowercase()),
            "hash".to_string(),
        );
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email exists".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(|u| (u.id, u.name.clone()))
            .collect())
    }
}
