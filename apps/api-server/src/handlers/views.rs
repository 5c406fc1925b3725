//! Domain to DTO conversions.

use quill_core::domain::{AuthoredPost, Post, User};
use quill_core::services::AuthSession;
use quill_shared::dto::{
    AuthResponse, PostListResponse, PostResponse, PostStatusResponse, UserResponse,
};

pub fn post_response(authored: AuthoredPost) -> PostResponse {
    let AuthoredPost { post, author_name } = authored;

    PostResponse {
        id: post.id,
        slug: post.slug,
        title: post.title,
        body: post.body,
        tags: post.tags,
        cover: post.cover,
        status: post.status.to_string(),
        author_id: post.author_id,
        author_name,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn post_list(posts: Vec<AuthoredPost>, page: Option<i64>) -> PostListResponse {
    PostListResponse {
        posts: posts.into_iter().map(post_response).collect(),
        page,
    }
}

pub fn status_response(post: Post) -> PostStatusResponse {
    PostStatusResponse {
        id: post.id,
        slug: post.slug,
        title: post.title,
        status: post.status.to_string(),
        updated_at: post.updated_at,
    }
}

pub fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        status: user.status,
    }
}

pub fn auth_response(session: AuthSession) -> AuthResponse {
    AuthResponse {
        user: user_response(session.user),
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
    }
}
