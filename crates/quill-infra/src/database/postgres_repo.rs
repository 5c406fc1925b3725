//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use quill_core::domain::{Post, PostListQuery, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Mask an email for logging to avoid PII in logs (`a***@example.com`).
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***{domain}"),
                _ => format!("***{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, query: PostListQuery) -> Result<Vec<Post>, RepoError> {
        let mut select = PostEntity::find();
        if query.published_only {
            select = select.filter(post::Column::Status.eq(post::Status::Published));
        }

        let result = select
            .order_by_desc(post::Column::CreatedAt)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_published_with_any_tag(
        &self,
        terms: &[String],
        exclude_slug: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<Post>, RepoError> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        // LIKE '%term%' is case-sensitive in PostgreSQL.
        let any_tag = terms.iter().fold(Condition::any(), |cond, term| {
            cond.add(post::Column::Tags.contains(term.as_str()))
        });

        let mut select = PostEntity::find()
            .filter(post::Column::Status.eq(post::Status::Published))
            .filter(any_tag);
        if let Some(slug) = exclude_slug {
            select = select.filter(post::Column::Slug.ne(slug));
        }

        let mut select = select.order_by_desc(post::Column::CreatedAt);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }

        let result = select.all(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(terms = ?terms, found = result.len(), "Tag lookup");

        Ok(result.into_iter().map(Into::into).collect())
    }
}
