//! Utility functions shared across layers.
//!
//! - [`token`] - Random alphanumeric tokens for short links and file names
//! - [`duplicates`] - Duplicate key detection for submitted id lists
//! - [`host`] - `scheme://host` extraction from absolute URLs
//! - [`request_url`] - Absolute request URL reconstruction from headers
//! - [`password`] - Argon2 password hashing and password policy
//! - [`image`] - Base64 `data:` image decoding

pub mod duplicates;
pub mod host;
pub mod image;
pub mod password;
pub mod request_url;
pub mod token;
