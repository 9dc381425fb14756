//! Short link creation and resolution service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::ShortLink;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::{AppError, conflict_constraint};
use crate::utils::token::generate_token;

/// Service mapping resource paths to short tokens and back.
///
/// # Get-or-create
///
/// A path is mapped at most once. The first request for a path generates a
/// token, checks it against existing tokens and inserts the mapping. Later
/// requests for the same path return the stored mapping unchanged.
///
/// Token generation is bounded by `max_attempts`. A unique-constraint
/// conflict on insert means either another request mapped the same path
/// first (its mapping is returned) or the token was taken in between (a new
/// token is tried within the same budget).
pub struct ShortLinkService<R: ShortLinkRepository> {
    repository: Arc<R>,
    token_length: usize,
    max_attempts: usize,
}

impl<R: ShortLinkRepository> ShortLinkService<R> {
    /// Creates a new short link service.
    pub fn new(repository: Arc<R>, token_length: usize, max_attempts: usize) -> Self {
        Self {
            repository,
            token_length,
            max_attempts,
        }
    }

    /// Returns the mapping for `full_path`, creating it if needed.
    ///
    /// The boolean is `true` when this call created the mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no free token was found within the
    /// attempt budget, or on database errors.
    pub async fn get_or_create(&self, full_path: &str) -> Result<(ShortLink, bool), AppError> {
        if let Some(existing) = self.repository.find_by_full_path(full_path).await? {
            return Ok((existing, false));
        }

        for attempt in 1..=self.max_attempts {
            let token = generate_token(self.token_length);

            if self.repository.token_exists(&token).await? {
                debug!(attempt, "Short token collision, regenerating");
                continue;
            }

            match self.repository.create(full_path, &token).await {
                Ok(link) => {
                    info!(full_path = %link.full_path, token = %link.short_token, "Short link created");
                    return Ok((link, true));
                }
                Err(err) if conflict_constraint(&err).is_some() => {
                    if let Some(existing) = self.repository.find_by_full_path(full_path).await? {
                        debug!(full_path = %full_path, "Short link created concurrently, reusing it");
                        return Ok((existing, false));
                    }
                    debug!(attempt, "Short token taken concurrently, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        warn!(
            full_path = %full_path,
            attempts = self.max_attempts,
            "Could not find a free short token"
        );

        Err(AppError::internal(
            "Failed to generate unique short token",
            json!({ "reason": "Too many collisions", "attempts": self.max_attempts }),
        ))
    }

    /// Resolves a token to the path it was created for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is unknown.
    pub async fn resolve(&self, token: &str) -> Result<String, AppError> {
        self.repository
            .find_by_token(token)
            .await?
            .map(|link| link.full_path)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "token": token })))
    }

    /// Builds the shareable URL for a mapping from a `scheme://host` prefix.
    pub fn short_url(&self, host_with_schema: &str, link: &ShortLink) -> String {
        format!("{}{}", host_with_schema.trim_end_matches('/'), link.public_path())
    }
}
