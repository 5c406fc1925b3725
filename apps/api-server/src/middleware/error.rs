//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{AuthError, StorageError};
use quill_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<String>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors.clone()),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                tracing::debug!(entity_type, %key, "Entity not found");
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::InvalidFields(fields) => {
                AppError::Validation(fields.iter().map(ToString::to_string).collect())
            }
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Auth(e) => e.into(),
            DomainError::Repository(e) => e.into(),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid login".to_string()),
            AuthError::TokenExpired => AppError::Unauthorized(
                "Your authentication token has expired. Please sign in again.".to_string(),
            ),
            AuthError::InvalidToken(msg) => {
                tracing::debug!(reason = %msg, "Rejected token");
                AppError::Unauthorized("Access denied".to_string())
            }
            AuthError::MissingAuth => AppError::Unauthorized(
                "Please provide a valid Bearer token in the Authorization header.".to_string(),
            ),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!(detail = %msg, "Constraint violation");
                AppError::Conflict("Resource already exists".to_string())
            }
            RepoError::Connection(msg) => {
                AppError::Internal(format!("Database connection error: {msg}"))
            }
            RepoError::Query(msg) => AppError::Internal(format!("Database query error: {msg}")),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedType(_) | StorageError::Empty => {
                AppError::BadRequest(format!("Post without file or invalid file type: {err}"))
            }
            StorageError::Backend(msg) => AppError::Internal(format!("Cover storage error: {msg}")),
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart payload: {err}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::error::FieldError;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::post_not_found("x"), StatusCode::NOT_FOUND),
            (
                DomainError::Validation("Page does not exist".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::InvalidFields(vec![FieldError::new("email", "Invalid email")]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::Duplicate("Email already registered".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Auth(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Repository(RepoError::Query("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_not_found_hides_key() {
        let err = AppError::from(DomainError::post_not_found("secret-draft"));
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Post not found"));
    }

    #[test]
    fn test_constraint_conflict_hides_database_detail() {
        let err = AppError::from(RepoError::Constraint(
            "duplicate key value violates unique constraint \"posts_slug_key\"".to_string(),
        ));

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Resource already exists"));
    }

    #[test]
    fn test_storage_rejections_are_bad_requests() {
        let err = AppError::from(StorageError::UnsupportedType("image/gif".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::from(StorageError::Backend("disk full".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
