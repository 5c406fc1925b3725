//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod form;
mod health;
mod posts;
mod views;


use std::path::Path;

use actix_files::Files;
use actix_web::web;
use quill_infra::storage::COVER_PREFIX;

/// Serve stored covers at `/covers`, matching the URLs `LocalCoverStorage` hands out.
pub fn cover_files(cover_dir: impl AsRef<Path>) -> Files {
    Files::new(
        &format!("/{COVER_PREFIX}"),
        cover_dir.as_ref().join(COVER_PREFIX),
    )
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/ping", web::get().to(health::ping))
            // Public blog
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts/{slug}", web::get().to(posts::get_post))
            .route("/posts/{slug}/related", web::get().to(posts::related_posts))
            .route("/tags/{tag}/posts", web::get().to(posts::posts_by_tag))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/signin", web::post().to(auth::signin))
                    .route("/validate", web::get().to(auth::validate)),
            )
            // Admin routes
            .route("/admin/slug-preview", web::get().to(admin::preview_slug))
            .service(
                web::scope("/admin/posts")
                    .route("", web::get().to(admin::list_posts))
                    .route("", web::post().to(admin::create_post))
                    .route("/{slug}", web::get().to(admin::get_post))
                    .route("/{slug}", web::put().to(admin::edit_post))
                    .route("/{slug}", web::delete().to(admin::delete_post))
                    .route("/{slug}/revert", web::put().to(admin::revert_post))
                    .route("/{slug}/publish", web::put().to(admin::publish_post)),
            ),
    );
}
