// src/lib.rs

pub mod auth;
pub mod config;
pub mod error;
pub mod jokes;
pub mod routes;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::auth::{Claims, JwksClient, Validator};
    pub use crate::config::{Config, ProviderConfig};
    pub use crate::error::AuthError;
    pub use crate::jokes::{Joke, JokeStore};
    pub use crate::routes::{build_routes, AppState};
}
