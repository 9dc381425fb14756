//! Storage for uploaded images.
//!
//! # Implementations
//!
//! - [`LocalMediaStorage`] - Files under a local media root, served by `ServeDir`

pub mod local_storage;
pub mod service;

pub use local_storage::LocalMediaStorage;
pub use service::{MediaError, MediaResult, MediaStorage};

#[cfg(test)]
pub use service::MockMediaStorage;
