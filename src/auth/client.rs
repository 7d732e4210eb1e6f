// src/auth/client.rs

use crate::auth::model::JsonWebKeySet;
use crate::error::AuthError;
use jsonwebtoken::DecodingKey;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// A client for fetching JSON Web Keys from the identity provider.
///
/// By default every key resolution fetches the JWKS document fresh; when a
/// cache TTL is configured, resolved keys are kept in memory and an unknown
/// `kid` still forces a fresh fetch before being reported as missing.
#[derive(Clone)]
pub struct JwksClient {
    // The client is internally ref-counted to allow for cheap cloning.
    inner: Arc<Inner>,
}

struct Inner {
    http_client: reqwest::Client,
    jwks_url: Url,
    // Cache stores `kid` -> `DecodingKey`, entries expiring after the TTL.
    key_cache: Option<Cache<String, Arc<DecodingKey>>>,
}

impl JwksClient {
    /// Creates a new `JwksClient` for the given JWKS endpoint.
    ///
    /// `fetch_timeout` bounds every network call so a slow provider stalls
    /// only the requesting task. `cache_ttl` of `None` disables caching.
    pub fn new(
        jwks_url: Url,
        fetch_timeout: Duration,
        cache_ttl: Option<Duration>,
    ) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder().timeout(fetch_timeout).build()?;

        let key_cache = cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(100) // Far more keys than any provider publishes.
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(Inner {
                http_client,
                jwks_url,
                key_cache,
            }),
        })
    }

    /// Fetches and parses the provider's JWKS document.
    ///
    /// Transport failures (including non-2xx statuses) and malformed JSON
    /// are reported as distinct error variants. No retries.
    #[instrument(skip(self), err)]
    pub async fn fetch(&self) -> Result<JsonWebKeySet, AuthError> {
        let response = self
            .inner
            .http_client
            .get(self.inner.jwks_url.clone())
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let key_set: JsonWebKeySet =
            serde_json::from_slice(&body).map_err(AuthError::JwksParse)?;

        debug!(keys = key_set.keys.len(), "fetched JWKS");
        Ok(key_set)
    }

    /// Retrieves the verification key for the given Key ID (`kid`).
    ///
    /// Consults the cache first when one is configured; a miss fetches the
    /// full key set, repopulates the cache, and resolves the key from the
    /// fresh document.
    #[instrument(skip(self), err)]
    pub async fn resolve_key(&self, kid: &str) -> Result<Arc<DecodingKey>, AuthError> {
        if let Some(cache) = &self.inner.key_cache {
            if let Some(key) = cache.get(kid).await {
                debug!(kid, "JWK cache hit");
                return Ok(key);
            }
            debug!(kid, "JWK cache miss, fetching from provider");
        }

        let key_set = self.fetch().await?;
        let key = Arc::new(key_set.decoding_key_for(kid)?);

        if let Some(cache) = &self.inner.key_cache {
            for jwk in &key_set.keys {
                if jwk.kty == "RSA" {
                    if let Ok(decoding_key) = jwk.decoding_key() {
                        cache.insert(jwk.kid.clone(), Arc::new(decoding_key)).await;
                    }
                }
            }
        }

        Ok(key)
    }
}
