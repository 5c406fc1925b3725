//! Application services built on top of the ports.

pub mod auth;
pub mod posts;

#[cfg(test)]
mod testing;

pub use auth::{AuthService, AuthSession, SignupInput};
pub use posts::PostService;
