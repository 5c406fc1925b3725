//! Cover storage implementations.

mod local;

pub use local::{COVER_PREFIX, LocalCoverStorage};
