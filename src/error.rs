// src/error.rs

use thiserror::Error;

/// Failures that can occur while authenticating a request.
///
/// Every variant collapses to a plain 401 at the HTTP boundary; the variant
/// itself is only ever logged server-side.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JWKS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JWKS document: {0}")]
    JwksParse(#[source] serde_json::Error),

    #[error("No key found for kid: {0}")]
    KeyNotFound(String),

    #[error("The JWT header is missing the 'kid' (Key ID) field")]
    MissingKeyId,

    #[error("Invalid JWK format: {0}")]
    InvalidKeyFormat(String),

    #[error("Token audience does not match the configured audience")]
    InvalidAudience,

    #[error("Token issuer does not match the configured issuer")]
    InvalidIssuer,

    #[error("Unsupported JWT algorithm: {0:?}")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),

    #[error("JWT validation error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
