//! Authentication extractor for admin routes.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use quill_core::domain::User;
use quill_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The signed-in user behind a `Authorization: Bearer <token>` header.
///
/// The token is verified and the user is loaded from storage on every request,
/// so deleted accounts lose access immediately.
/// ```ignore
/// async fn protected_route(admin: AdminUser) -> impl Responder {
///     format!("Hello, {}!", admin.0.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.auth.clone(),
            None => {
                return Box::pin(async {
                    Err(AppError::Internal("AppState not found in app data".to_string()))
                });
            }
        };
        let token = bearer_token(req);

        Box::pin(async move {
            let token = token?;
            let user = auth.authenticate(&token).await?;
            Ok(AdminUser(user))
        })
    }
}
