#![doc = "The `todo_vault` library crate."]
#![doc = ""]
#![doc = "Per-user todo lists behind stateless bearer tokens. The crate holds the"]
#![doc = "credential hashing, token service, identity resolution, ownership-scoped"]
#![doc = "storage and the actix-web routes. The binary (`main.rs`) loads configuration,"]
#![doc = "builds an `AppState` and serves `routes::config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
