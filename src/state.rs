use crate::auth::TokenService;
use crate::config::Config;
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, TodoStore, UserStore};
use chrono::Duration;
use std::sync::Arc;

/// Shared application state, built once at startup and handed to actix as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: TokenService,
    /// Lifetime of tokens issued at login.
    pub access_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Builds state around one store that holds both users and todos.
    pub fn new<S>(
        store: Arc<S>,
        tokens: TokenService,
        access_token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self
    where
        S: UserStore + TodoStore + 'static,
    {
        Self {
            users: store.clone(),
            todos: store,
            tokens,
            access_token_ttl,
            bcrypt_cost,
        }
    }

    /// Connects to Postgres when a database URL is configured, otherwise falls
    /// back to the in-memory store.
    pub async fn init(config: &Config) -> Result<Self, AppError> {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.jwt_algorithm);

        match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url, config.database_max_connections).await?;
                store.migrate().await?;
                log::info!("using postgres store");
                Ok(Self::new(
                    Arc::new(store),
                    tokens,
                    config.access_token_ttl,
                    config.bcrypt_cost,
                ))
            }
            None => {
                log::warn!("DATABASE_URL is not set; data is kept in memory and lost on restart");
                Ok(Self::new(
                    Arc::new(MemoryStore::new()),
                    tokens,
                    config.access_token_ttl,
                    config.bcrypt_cost,
                ))
            }
        }
    }
}
