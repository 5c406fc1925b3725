//! Public blog endpoints. Only published posts are visible here.

use actix_web::{HttpResponse, web};

use quill_core::services::posts::DEFAULT_PAGE_SIZE;
use quill_shared::dto::{LimitParams, PageParams, PostEnvelope};

use super::views::{post_list, post_response};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts?page=&limit=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE as i64);

    let posts = state.posts.list_published_posts(page, limit).await?;
    Ok(HttpResponse::Ok().json(post_list(posts, Some(page))))
}

/// GET /api/posts/{slug}
pub async fn get_post(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_published_post(&slug).await?;
    Ok(HttpResponse::Ok().json(PostEnvelope {
        post: post_response(post),
    }))
}

/// GET /api/posts/{slug}/related
pub async fn related_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.related_posts(&slug).await?;
    Ok(HttpResponse::Ok().json(post_list(posts, None)))
}

/// GET /api/tags/{tag}/posts?limit=
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    tag: web::Path<String>,
    query: web::Query<LimitParams>,
) -> AppResult<HttpResponse> {
    if tag.trim().is_empty() {
        return Err(AppError::BadRequest("Tag not provided".to_string()));
    }

    let limit = query.limit.filter(|&n| n > 0);
    let posts = state.posts.posts_by_tag(&tag, limit).await?;
    Ok(HttpResponse::Ok().json(post_list(posts, None)))
}
