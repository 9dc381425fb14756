//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Media paths are rendered as public URLs here.

pub mod auth;
pub mod catalog;
pub mod health;
pub mod pagination;
pub mod recipes;
pub mod users;
