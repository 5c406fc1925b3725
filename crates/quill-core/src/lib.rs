//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, ports, and the services that implement slug assignment, tag lookups
//! and the post lifecycle on top of those ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
