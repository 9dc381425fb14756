//! Random alphanumeric token generation.
//!
//! Tokens are drawn uniformly with replacement from a 62-symbol alphabet
//! (`A-Z`, `a-z`, `0-9`) using the thread-local generator from `rand`.
//! They name short links and uploaded media files; they are not secrets.
//!
//! Authentication keys are different: they come from the OS generator via
//! `getrandom` and are hex encoded.

use rand::Rng;

/// Alphabet used for generated tokens.
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default short link token length.
pub const DEFAULT_TOKEN_LENGTH: usize = 6;

/// Random bytes in an authentication key (40 hex characters).
const AUTH_KEY_BYTES: usize = 20;

/// Generates a random token of exactly `length` characters.
///
/// # Examples
///
/// ```ignore
/// let token = generate_token(6);
/// assert_eq!(token.len(), 6);
/// assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_token(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Generates a 40-character lowercase hex authentication key.
///
/// # Errors
///
/// Fails only if the system random number generator is unavailable.
pub fn generate_auth_key() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; AUTH_KEY_BYTES];

    getrandom::fill(&mut buffer)?;

    Ok(hex::encode(buffer))
}
