//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and media storage.
//!
//! # Modules
//!
//! - [`media`] - Image storage (local filesystem)
//! - [`persistence`] - PostgreSQL repository implementations

pub mod media;
pub mod persistence;
