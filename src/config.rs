// src/config.rs

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "./views";
pub const DEFAULT_JWKS_FETCH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;

/// Identity-provider settings: the token issuer and the registered client.
///
/// The client id/secret are part of the provider registration but take no
/// part in token validation.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider base URL; doubles as the expected `iss` claim.
    pub domain: Url,
    /// Expected `aud` claim.
    pub audience: String,
    pub client_id: String,
    pub client_secret: SecretString,
}

/// The full service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub bind_address: String,
    /// Directory served at `/`.
    pub static_dir: PathBuf,
    /// Bound on every JWKS network call.
    pub jwks_fetch_timeout: Duration,
    /// When set, resolved keys are cached this long; `None` fetches the
    /// JWKS fresh on every validation.
    pub jwks_cache_ttl: Option<Duration>,
    /// Clock-skew tolerance for `exp`.
    pub jwt_leeway: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: String,
        source: url::ParseError,
    },

    #[error("Invalid number in {var}: {value}")]
    InvalidNumber { var: String, value: String },
}

fn require(vars: &HashMap<String, String>, var: &str) -> Result<String, ConfigError> {
    vars.get(var)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn parse_secs(vars: &HashMap<String, String>, var: &str) -> Result<Option<u64>, ConfigError> {
    vars.get(var)
        .map(|value| {
            value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: var.to_string(),
                value: value.clone(),
            })
        })
        .transpose()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a map (the seam used by tests).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let domain_raw = require(vars, "AUTH_DOMAIN")?;
        let domain = Url::parse(&domain_raw).map_err(|source| ConfigError::InvalidUrl {
            var: "AUTH_DOMAIN".to_string(),
            source,
        })?;

        let provider = ProviderConfig {
            domain,
            audience: require(vars, "AUTH_AUDIENCE")?,
            client_id: require(vars, "AUTH_CLIENT_ID")?,
            client_secret: require(vars, "AUTH_CLIENT_SECRET")?.into(),
        };

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let static_dir = vars
            .get("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let jwks_fetch_timeout = Duration::from_secs(
            parse_secs(vars, "JWKS_FETCH_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_JWKS_FETCH_TIMEOUT_SECS),
        );

        let jwks_cache_ttl = parse_secs(vars, "JWKS_CACHE_TTL_SECS")?.map(Duration::from_secs);

        let jwt_leeway = Duration::from_secs(
            parse_secs(vars, "JWT_LEEWAY_SECS")?.unwrap_or(DEFAULT_JWT_LEEWAY_SECS),
        );

        Ok(Config {
            provider,
            bind_address,
            static_dir,
            jwks_fetch_timeout,
            jwks_cache_ttl,
            jwt_leeway,
        })
    }
}
