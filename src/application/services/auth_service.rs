//! Authentication service: login, token validation and logout.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::User;
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::verify_password;
use crate::utils::token::generate_auth_key;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Service for issuing and checking authentication tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<U: UserRepository, T: TokenRepository> {
    users: Arc<U>,
    tokens: Arc<T>,
    signing_secret: String,
}

impl<U: UserRepository, T: TokenRepository> AuthService<U, T> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - user repository for credential lookup
    /// - `tokens` - token repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(users: Arc<U>, tokens: Arc<T>, signing_secret: String) -> Self {
        Self {
            users,
            tokens,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|_| AppError::internal("Invalid signing secret", json!({})))?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Checks credentials and issues a new token.
    ///
    /// Returns the raw token. Only its hash is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the email is unknown or the
    /// password does not match.
    /// Returns [`AppError::Internal`] on database or RNG errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let invalid = || {
            AppError::bad_request(
                "Unable to log in with provided credentials",
                json!({ "non_field_errors": ["Unable to log in with provided credentials"] }),
            )
        };

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid());
        }

        let token = generate_auth_key().map_err(|e| {
            tracing::error!(error = %e, "Random generator failure");
            AppError::internal("Failed to generate token", json!({}))
        })?;

        self.tokens
            .create_token(user.id, &self.hash_token(&token)?)
            .await?;

        info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Authenticates a raw token and returns its owner.
    ///
    /// On success, updates the `last_used_at` timestamp. A failure to record
    /// usage does not fail the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let token_hash = self.hash_token(token)?;

        let user = self
            .tokens
            .find_user_by_token(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
            })?;

        let _ = self.tokens.update_last_used(&token_hash).await;

        Ok(user)
    }

    /// Revokes every token of the user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn logout(&self, user: &User) -> Result<(), AppError> {
        let removed = self.tokens.delete_user_tokens(user.id).await?;
        info!(user_id = user.id, removed, "User logged out");
        Ok(())
    }
}
