//! Admin post management. Every handler requires an [`AdminUser`].

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use quill_core::domain::{NewPostInput, PostChanges, PostStatus};
use quill_shared::dto::{
    PageParams, PostEnvelope, SlugPreviewParams, SlugPreviewResponse, SuccessResponse,
};

use super::form::{CoverUpload, PostForm};
use super::views::{post_list, post_response, status_response};
use crate::middleware::auth::AdminUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/admin/posts?page=
pub async fn list_posts(
    _admin: AdminUser,
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1);

    let posts = state.posts.list_posts(page).await?;
    Ok(HttpResponse::Ok().json(post_list(posts, Some(page))))
}

/// GET /api/admin/posts/{slug}
pub async fn get_post(
    _admin: AdminUser,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(&slug).await?;
    Ok(HttpResponse::Ok().json(PostEnvelope {
        post: post_response(post),
    }))
}

/// GET /api/admin/slug-preview?title=
///
/// The slug a post with this title would get right now. Not a reservation.
pub async fn preview_slug(
    _admin: AdminUser,
    state: web::Data<AppState>,
    query: web::Query<SlugPreviewParams>,
) -> AppResult<HttpResponse> {
    let slug = state.posts.unique_slug(&query.title).await?;
    Ok(HttpResponse::Ok().json(SlugPreviewResponse { slug }))
}

/// POST /api/admin/posts (multipart: title, tags, body, cover)
pub async fn create_post(
    admin: AdminUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload).await?;

    let (title, tags, body) = match (form.title, form.tags, form.body) {
        (Some(title), Some(tags), Some(body)) => (title, tags, body),
        (title, tags, body) => {
            let missing = [("title", title), ("tags", tags), ("body", body)]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(field, _)| format!("{field}: Required"))
                .collect();
            return Err(AppError::Validation(missing));
        }
    };
    let Some(cover) = form.cover else {
        return Err(AppError::BadRequest(
            "Post without file or invalid file type".to_string(),
        ));
    };

    let cover = store_cover(&state, cover).await?;
    let post = state
        .posts
        .create_post(
            admin.0.id,
            NewPostInput {
                title,
                tags,
                body,
                cover,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(PostEnvelope {
        post: post_response(post),
    }))
}

/// PUT /api/admin/posts/{slug} (multipart, every field optional)
pub async fn edit_post(
    _admin: AdminUser,
    state: web::Data<AppState>,
    slug: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload).await?;

    let status = form
        .status
        .map(|raw| raw.parse::<PostStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(vec![format!("status: {e}")]))?;

    // Fail before storing a cover for a post that does not exist.
    state.posts.get_post(&slug).await?;

    let cover = match form.cover {
        Some(upload) => Some(store_cover(&state, upload).await?),
        None => None,
    };

    let post = state
        .posts
        .edit_post(
            &slug,
            PostChanges {
                status,
                title: form.title,
                tags: form.tags,
                body: form.body,
                cover,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(PostEnvelope {
        post: post_response(post),
    }))
}

/// PUT /api/admin/posts/{slug}/revert
pub async fn revert_post(
    _admin: AdminUser,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.revert_post(&slug).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: "Post reverted to draft".to_string(),
        post: Some(status_response(post)),
    }))
}

/// PUT /api/admin/posts/{slug}/publish
pub async fn publish_post(
    _admin: AdminUser,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.publish_post(&slug).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: "Post published".to_string(),
        post: Some(status_response(post)),
    }))
}

/// DELETE /api/admin/posts/{slug}
pub async fn delete_post(
    admin: AdminUser,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete_post(&slug).await?;
    tracing::info!(user_id = %admin.0.id, slug = %slug, "Post removed by admin");

    Ok(HttpResponse::Ok().json(SuccessResponse::<()> {
        success: "Post deleted".to_string(),
        post: None,
    }))
}

async fn store_cover(state: &AppState, upload: CoverUpload) -> AppResult<String> {
    let CoverUpload {
        file_name,
        content_type,
        bytes,
    } = upload;

    Ok(state
        .covers
        .store(&file_name, &content_type, bytes)
        .await?)
}
