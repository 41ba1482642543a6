use jsonwebtoken::Algorithm;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Signing secret used when none is configured. Only fit for local development.
pub const INSECURE_DEFAULT_SECRET: &str = "insecure-development-secret-change-me";

const DEFAULT_TOKEN_MINUTES: i64 = 30;

/// Runtime configuration, loaded once at startup.
///
/// `Debug` is deliberately not derived so the signing secret cannot end up in logs.
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    /// Lifetime of tokens issued at login.
    pub access_token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

/// A configuration value that is present but unusable.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, applying defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let jwt_secret = match lookup("JWT_SECRET").or_else(|| lookup("BETTER_AUTH_SECRET")) {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                log::warn!("JWT_SECRET is not set; using an insecure development secret");
                INSECURE_DEFAULT_SECRET.to_string()
            }
        };

        let jwt_algorithm = match lookup("JWT_ALGORITHM") {
            Some(value) => parse_hmac_algorithm(&value).ok_or(ConfigError::Invalid {
                key: "JWT_ALGORITHM",
                value,
            })?,
            None => Algorithm::HS256,
        };

        let token_minutes: i64 =
            parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", &lookup, DEFAULT_TOKEN_MINUTES)?;
        let access_token_ttl = chrono::Duration::try_minutes(token_minutes)
            .filter(|_| token_minutes > 0)
            .ok_or(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: token_minutes.to_string(),
            })?;

        let bcrypt_cost: u32 = parse_or("BCRYPT_COST", &lookup, bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", &lookup, 10)?,
            server_port: parse_or("SERVER_PORT", &lookup, 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_algorithm,
            access_token_ttl,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Only the symmetric HMAC family is accepted.
fn parse_hmac_algorithm(value: &str) -> Option<Algorithm> {
    match Algorithm::from_str(value.trim()).ok()? {
        alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => Some(alg),
        _ => None,
    }
}
