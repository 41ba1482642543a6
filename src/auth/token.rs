use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime applied when a caller does not ask for a specific one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Email of the user at the time the token was issued.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: u64,
}

/// Issues and verifies HMAC-signed access tokens.
///
/// Holds the process-wide signing secret. It is built once at startup and never
/// changes afterwards; verification is pure computation and needs no lock or I/O.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is checked by `verify_at` so that a token expiring exactly now is rejected.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
        }
    }

    /// Issues a token for the given user, valid for `ttl` or
    /// [`DEFAULT_TOKEN_TTL_MINUTES`] when `ttl` is `None`.
    pub fn issue(
        &self,
        user_id: i32,
        email: &str,
        ttl: Option<Duration>,
    ) -> Result<String, AppError> {
        self.issue_at(user_id, email, ttl, now_timestamp())
    }

    fn issue_at(
        &self,
        user_id: i32,
        email: &str,
        ttl: Option<Duration>,
        now: u64,
    ) -> Result<String, AppError> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES));
        let ttl_secs = u64::try_from(ttl.num_seconds())
            .map_err(|_| AppError::InternalServerError("token lifetime must be positive".into()))?;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + ttl_secs,
        };

        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?)
    }

    /// Verifies the signature, algorithm and expiry of a token.
    ///
    /// Returns `None` for every kind of invalid token. The reason is only logged.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, now_timestamp())
    }

    fn verify_at(&self, token: &str, now: u64) -> Option<Claims> {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                log::debug!("rejected token: {}", e);
                return None;
            }
        };

        if claims.exp <= now {
            log::debug!("rejected token: expired at {}", claims.exp);
            return None;
        }
        Some(claims)
    }
}

fn now_timestamp() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
