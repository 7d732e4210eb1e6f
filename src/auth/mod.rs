// src/auth/mod.rs

pub mod client;
pub mod middleware;
pub mod model;
pub mod validator;

pub use client::JwksClient;
pub use middleware::require_auth;
pub use model::{JsonWebKey, JsonWebKeySet};
pub use validator::{Claims, Validator};
