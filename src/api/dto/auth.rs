//! DTOs for token login.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/auth/token/login/`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub auth_token: String,
}
