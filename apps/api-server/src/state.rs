//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CoverStorage, PostRepository, UserRepository};
use quill_core::services::{AuthService, PostService};
use quill_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
    LocalCoverStorage,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub auth: Arc<AuthService>,
    pub covers: Arc<dyn CoverStorage>,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>);

impl AppState {
    /// Build the application state, falling back to in-memory storage when the
    /// database is not configured or unreachable.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, users) = Self::repositories(config).await;
        let covers = Arc::new(LocalCoverStorage::new(
            config.cover_dir.clone(),
            config.base_url.clone(),
        ));

        tracing::info!(tag_match = %config.tag_match, "Application state initialized");
        Self::from_parts(config, posts, users, covers)
    }

    pub fn from_parts(
        config: &AppConfig,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        covers: Arc<dyn CoverStorage>,
    ) -> Self {
        let tokens = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords = Arc::new(Argon2PasswordService::new());

        Self {
            posts: Arc::new(
                PostService::new(posts, users.clone()).with_tag_match(config.tag_match),
            ),
            auth: Arc::new(AuthService::new(users, tokens, passwords)),
            covers,
        }
    }

    fn in_memory() -> Repositories {
        (
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        use migration::MigratorTrait;
        use quill_infra::{PostgresPostRepository, PostgresUserRepository, database::connect};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        let conn = match connect(db_config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                return Self::in_memory();
            }
        };

        if db_config.run_migrations {
            match migration::Migrator::up(&conn, None).await {
                Ok(()) => tracing::info!("Database migrations applied"),
                Err(e) => tracing::error!(error = %e, "Failed to apply migrations"),
            }
        }

        (
            Arc::new(PostgresPostRepository::new(conn.clone())),
            Arc::new(PostgresUserRepository::new(conn)),
        )
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory()
    }
}
