//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create an admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to sign in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: bool,
}

/// `{"user": ...}` envelope returned by token validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Signup/signin result: the user plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// A post as returned by the public and admin APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub tags: String,
    pub cover: String,
    /// `DRAFT` or `PUBLISHED`.
    pub status: String,
    pub author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `{"post": ...}` envelope for single-post responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub post: PostResponse,
}

/// A list of posts. `page` is set on paginated listings only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

/// Post summary returned after a publish/revert action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStatusResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Confirmation message, optionally carrying the affected post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<T>,
}

/// `?title=` query parameter of the slug preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugPreviewParams {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugPreviewResponse {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub pong: bool,
}

/// `?page=&limit=` query parameters of the listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `?limit=` query parameter of the tag listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u64>,
}
