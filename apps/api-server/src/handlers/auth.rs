//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::services::SignupInput;
use quill_shared::dto::{SigninRequest, SignupRequest, UserEnvelope};

use super::views::{auth_response, user_response};
use crate::middleware::auth::AdminUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let SignupRequest {
        name,
        email,
        password,
    } = body.into_inner();

    let session = state
        .auth
        .signup(SignupInput {
            name,
            email,
            password,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response(session)))
}

/// POST /api/auth/signin
pub async fn signin(
    state: web::Data<AppState>,
    body: web::Json<SigninRequest>,
) -> AppResult<HttpResponse> {
    let session = state.auth.signin(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(auth_response(session)))
}

/// GET /api/auth/validate - Protected route
pub async fn validate(admin: AdminUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserEnvelope {
        user: user_response(admin.0),
    }))
}
