// src/auth/validator.rs

use crate::auth::client::JwksClient;
use crate::config::Config;
use crate::error::AuthError;
use jsonwebtoken::{decode, decode_header, Algorithm, TokenData, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// The claims decoded from a valid access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: u64,
}

/// Verifies bearer tokens against the configured identity provider.
///
/// Created once at startup and cloned into the router state; all validation
/// requests share the underlying JWKS client.
#[derive(Clone)]
pub struct Validator {
    issuer: String,
    audience: String,
    leeway: Duration,
    jwks_client: JwksClient,
}

// Decodes the payload segment of a JWT without verifying it, for the claim
// checks that must run before any network traffic.
fn decode_raw_payload(token: &str) -> Result<serde_json::Value, AuthError> {
    let payload_segment = token
        .split('.')
        .nth(1)
        .ok_or_else(invalid_token)?;
    let payload_bytes = base64_url::decode(payload_segment).map_err(|_| invalid_token())?;
    serde_json::from_slice(&payload_bytes).map_err(|_| invalid_token())
}

fn invalid_token() -> AuthError {
    AuthError::Jwt(jsonwebtoken::errors::ErrorKind::InvalidToken.into())
}

impl Validator {
    /// Creates a new `Validator` from the service configuration.
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let jwks_url = config
            .provider
            .domain
            .join(".well-known/jwks.json")
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

        let jwks_client =
            JwksClient::new(jwks_url, config.jwks_fetch_timeout, config.jwks_cache_ttl)?;

        Ok(Self {
            issuer: config.provider.domain.as_str().to_string(),
            audience: config.provider.audience.clone(),
            leeway: config.jwt_leeway,
            jwks_client,
        })
    }

    /// Validates an access token.
    ///
    /// Checks run in a fixed, short-circuiting order:
    ///
    /// 1. The `aud` claim must equal the configured audience exactly. A
    ///    single string value is required; audience arrays are rejected.
    /// 2. The `iss` claim must equal the configured issuer exactly.
    /// 3. The header must carry `alg: RS256` and a `kid` that resolves
    ///    against the provider's JWKS (the only step that touches the
    ///    network).
    /// 4. Signature and registered claims are verified with the resolved
    ///    key.
    ///
    /// The claim checks in 1 and 2 read the unverified payload, so a token
    /// that fails them is rejected without a JWKS fetch.
    #[instrument(skip(self, token), err)]
    pub async fn validate(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let payload = decode_raw_payload(token)?;

        match payload.get("aud").and_then(serde_json::Value::as_str) {
            Some(aud) if aud == self.audience => {}
            _ => return Err(AuthError::InvalidAudience),
        }

        match payload.get("iss").and_then(serde_json::Value::as_str) {
            Some(iss) if iss == self.issuer => {}
            _ => return Err(AuthError::InvalidIssuer),
        }

        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let decoding_key = self.jwks_client.resolve_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = self.leeway.as_secs();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Ok(decode::<Claims>(token, &decoding_key, &validation)?)
    }
}
