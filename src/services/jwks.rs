//! Identity provider token verification backed by a JWKS endpoint

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::{sync::RwLock, time::Instant};

use super::identity::{AuthError, TokenVerifier};
use crate::config::AuthConfig;

/// Tokens must be signed with this algorithm
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Minimum delay between two key set downloads
const REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(rename = "use")]
    use_: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    /// Last successful download, drives the TTL
    fetched_at: Option<Instant>,
    /// Last download attempt, successful or not, drives the cooldown
    last_attempt: Option<Instant>,
}

impl KeyCache {
    fn fresh_key(&self, kid: &str, ttl: Duration) -> Option<DecodingKey> {
        let fetched_at = self.fetched_at?;
        if fetched_at.elapsed() >= ttl {
            return None;
        }
        self.keys.get(kid).cloned()
    }

    fn may_refresh(&self) -> bool {
        self.last_attempt
            .map_or(true, |at| at.elapsed() >= REFRESH_COOLDOWN)
    }

    /// Any cached key for `kid`, stale or not
    fn known_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if self.keys.is_empty() {
            return Err(AuthError::KeysUnavailable(
                "no signing keys loaded".to_string(),
            ));
        }
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown signing key {}", kid)))
    }
}

/// Verifies RS256 tokens issued by the configured identity provider
pub struct JwksVerifier {
    client: reqwest::Client,
    jwks_uri: String,
    issuer: String,
    audience: String,
    cache_ttl: Duration,
    cache: RwLock<KeyCache>,
}

impl JwksVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            client,
            jwks_uri: config.jwks_uri(),
            issuer: config.issuer(),
            audience: config.audience.clone(),
            cache_ttl: Duration::from_secs(config.jwks_cache_seconds),
            cache: RwLock::new(KeyCache::default()),
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, DecodingKey>, AuthError> {
        let unavailable = |e: reqwest::Error| AuthError::KeysUnavailable(e.to_string());

        let jwks: JwksResponse = self
            .client
            .get(&self.jwks_uri)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            if jwk.kty != "RSA" || jwk.use_.as_deref().is_some_and(|u| u != "sig") {
                continue;
            }
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                continue;
            };
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    keys.insert(jwk.kid, key);
                }
                Err(err) => tracing::warn!(kid = %jwk.kid, "Skipping invalid signing key: {}", err),
            }
        }

        if keys.is_empty() {
            return Err(AuthError::KeysUnavailable(
                "no usable RSA signing keys".to_string(),
            ));
        }

        tracing::info!(count = keys.len(), uri = %self.jwks_uri, "Signing keys refreshed");
        Ok(keys)
    }

    /// Key for `kid`, downloading the key set when it is stale or lacks the key.
    ///
    /// The download runs without holding the cache lock; at most one attempt
    /// starts per cooldown window.
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cache.read().await.fresh_key(kid, self.cache_ttl) {
            return Ok(key);
        }

        {
            let mut cache = self.cache.write().await;
            // Another request may have refreshed while we waited for the lock
            if let Some(key) = cache.fresh_key(kid, self.cache_ttl) {
                return Ok(key);
            }
            if !cache.may_refresh() {
                return cache.known_key(kid);
            }
            cache.last_attempt = Some(Instant::now());
        }

        let fetched = self.fetch_keys().await;

        let mut cache = self.cache.write().await;
        match fetched {
            Ok(keys) => {
                cache.keys = keys;
                cache.fetched_at = Some(Instant::now());
            }
            Err(err) if cache.keys.is_empty() => {
                tracing::error!("Cannot load signing keys: {}", err);
                return Err(err);
            }
            Err(err) => {
                tracing::error!("Key refresh failed, keeping previous keys: {}", err);
            }
        }

        cache.known_key(kid)
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<(), AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if header.alg != SIGNING_ALGORITHM {
            return Err(AuthError::InvalidToken(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token has no key id".to_string()))?;
        let key = self.key_for(&kid).await?;

        decode::<serde_json::Value>(token, &key, &self.validation())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(())
    }
}
