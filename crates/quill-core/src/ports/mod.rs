//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{BaseRepository, PostRepository, UserRepository};
pub use storage::{ALLOWED_COVER_TYPES, CoverStorage, StorageError, is_allowed_cover_type};
