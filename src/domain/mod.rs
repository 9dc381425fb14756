//! Domain layer containing business entities and logic.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented by
//! `crate::infrastructure::persistence`; business orchestration lives in
//! [`crate::application::services`].
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`shopping_list`] - Aggregation of cart ingredients into a shopping list

pub mod entities;
pub mod repositories;
pub mod shopping_list;
