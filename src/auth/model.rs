// src/auth/model.rs

use crate::error::AuthError;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;

/// A single JSON Web Key (JWK) as defined in RFC 7517, carrying the fields
/// the identity provider publishes for its RSA signing keys.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,
    pub kid: String,
    #[serde(rename = "use")]
    pub use_purpose: Option<String>,
    pub alg: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
    /// X.509 certificate chain; the first entry is the leaf certificate for
    /// this key.
    #[serde(default)]
    pub x5c: Vec<String>,
}

impl JsonWebKey {
    /// Returns this key's leaf certificate wrapped in PEM armor.
    pub fn pem_certificate(&self) -> Result<String, AuthError> {
        let leaf = self.x5c.first().ok_or_else(|| {
            AuthError::InvalidKeyFormat(format!("key {} has an empty certificate chain", self.kid))
        })?;
        Ok(format!(
            "-----BEGIN CERTIFICATE-----\n{leaf}\n-----END CERTIFICATE-----"
        ))
    }

    /// Builds the verification key from this key's RSA components.
    ///
    /// The `n`/`e` components encode the same public key as the leaf
    /// certificate; `jsonwebtoken` consumes them directly.
    pub fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        if self.kty != "RSA" {
            return Err(AuthError::InvalidKeyFormat(format!(
                "unsupported key type '{}' for kid {}",
                self.kty, self.kid
            )));
        }
        let n = self.n.as_deref().ok_or_else(|| {
            AuthError::InvalidKeyFormat("RSA key missing 'n' component".to_string())
        })?;
        let e = self.e.as_deref().ok_or_else(|| {
            AuthError::InvalidKeyFormat("RSA key missing 'e' component".to_string())
        })?;
        Ok(DecodingKey::from_rsa_components(n, e)?)
    }
}

/// A JSON Web Key Set (JWKS): the ordered collection of keys published at
/// the provider's `/.well-known/jwks.json` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Returns the first key whose `kid` matches, scanning in document order.
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }

    /// Resolves the PEM-armored leaf certificate for the key matching `kid`.
    ///
    /// The certificate always comes from the matched key's own chain, never
    /// from another entry's chain at the same index.
    pub fn certificate_for(&self, kid: &str) -> Result<String, AuthError> {
        self.find(kid)
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))?
            .pem_certificate()
    }

    /// Resolves the verification key for the key matching `kid`.
    pub fn decoding_key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        self.find(kid)
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))?
            .decoding_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MODULUS: &str = "q-DBzNdcfrbnGbFvA5om7r7dNsaXBRMYcwlqGGX4Ljn0PuuVSTU34DctcMK6NvSMbOsRzKcdW87tjLl_TQQOQdGrknYcINWgjO36_OzzvlKMtdNppad5CBuNd20TGQwi366CK1x9WmWdXG-wPUvpnV5aY-w65nZd11jlaOsWcnvkcRfudZM3jhQp9I0pctu1dkUmN9SihWXc_0TFQHCrPakGshv4jm3b3Brq1tiFwbl7LD04T3bqtN8s6HnN_dnbFLKXrc9_-uFcd6P8cjVBK-EInUEf0RVomosYMnQ2M07OHAxaPoUZ6OzdpOYwq2MQ-lwjrPjB-glgU2tthIlG2w";

    fn sample_key_set() -> JsonWebKeySet {
        serde_json::from_value(serde_json::json!({
            "keys": [
                {
                    "kty": "RSA",
                    "kid": "first-key",
                    "use": "sig",
                    "alg": "RS256",
                    "n": TEST_MODULUS,
                    "e": "AQAB",
                    "x5c": ["Zmlyc3QtY2VydA=="]
                },
                {
                    "kty": "RSA",
                    "kid": "second-key",
                    "use": "sig",
                    "alg": "RS256",
                    "n": TEST_MODULUS,
                    "e": "AQAB",
                    "x5c": ["c2Vjb25kLWNlcnQ="]
                }
            ]
        }))
        .expect("sample JWKS should deserialize")
    }

    #[test]
    fn find_matches_by_kid() {
        let key_set = sample_key_set();
        assert_eq!(key_set.find("second-key").map(|k| k.kid.as_str()), Some("second-key"));
        assert!(key_set.find("absent").is_none());
    }

    #[test]
    fn certificate_comes_from_the_matched_key_chain() {
        // The matched key is the second entry; its own leaf must be used,
        // not the first entry's leaf at the same chain index.
        let pem = sample_key_set().certificate_for("second-key").unwrap();
        assert_eq!(
            pem,
            "-----BEGIN CERTIFICATE-----\nc2Vjb25kLWNlcnQ=\n-----END CERTIFICATE-----"
        );
    }

    #[test]
    fn unknown_kid_is_key_not_found() {
        let result = sample_key_set().certificate_for("absent");
        assert!(matches!(result, Err(AuthError::KeyNotFound(kid)) if kid == "absent"));
    }

    #[test]
    fn empty_chain_is_invalid_key_format() {
        let key_set: JsonWebKeySet = serde_json::from_value(serde_json::json!({
            "keys": [{"kty": "RSA", "kid": "bare", "n": TEST_MODULUS, "e": "AQAB"}]
        }))
        .unwrap();
        assert!(matches!(
            key_set.certificate_for("bare"),
            Err(AuthError::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn decoding_key_requires_rsa_components() {
        let key_set: JsonWebKeySet = serde_json::from_value(serde_json::json!({
            "keys": [{"kty": "RSA", "kid": "partial", "e": "AQAB"}]
        }))
        .unwrap();
        assert!(matches!(
            key_set.decoding_key_for("partial"),
            Err(AuthError::InvalidKeyFormat(_))
        ));

        assert!(sample_key_set().decoding_key_for("first-key").is_ok());
    }

    #[test]
    fn non_rsa_key_is_rejected() {
        let key_set: JsonWebKeySet = serde_json::from_value(serde_json::json!({
            "keys": [{"kty": "EC", "kid": "curve", "x5c": ["Y2VydA=="]}]
        }))
        .unwrap();
        assert!(matches!(
            key_set.decoding_key_for("curve"),
            Err(AuthError::InvalidKeyFormat(_))
        ));
    }
}
