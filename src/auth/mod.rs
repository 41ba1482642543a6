pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use identity::{resolve_identity, AuthenticatedUser};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account; also the login key.
    #[validate(email)]
    pub email: String,
    /// At least 8 characters and at most 72 bytes once UTF-8 encoded.
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    #[validate(custom = "validate_password_bytes")]
    pub password: String,
}

/// Response returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl AuthResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > password::BCRYPT_MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_length");
        err.message = Some("Password cannot be longer than 72 bytes".into());
        return Err(err);
    }
    Ok(())
}
