//! JWKS client: fetches the issuer's JSON Web Key Set and caches the decoded keys.
//!
//! The cache is shared by every request. It is replaced as a whole (`Arc` swap
//! under a write lock), so readers always see either the previous or the new set.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;
use url::Url;

use crate::services::auth::error::AuthError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

struct CachedJwks {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

impl CachedJwks {
    fn from_set(set: &JwkSet) -> Self {
        let mut keys = HashMap::with_capacity(set.keys.len());

        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.as_deref() else {
                tracing::debug!("skipping jwk without kid");
                continue;
            };
            if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
                continue;
            }
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid.to_string(), key);
                }
                Err(err) => {
                    tracing::warn!(kid = %kid, error = %err, "skipping unusable jwk");
                }
            }
        }

        Self {
            keys,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }

    fn lookup(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::invalid_header("unable to find the appropriate key"))
    }
}

pub struct JwksClient {
    url: Url,
    http: reqwest::Client,
    cache: RwLock<Option<Arc<CachedJwks>>>,
    refresh_lock: Mutex<()>,
    cache_ttl: Duration,
}

impl std::fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksClient")
            .field("url", &self.url.as_str())
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl JwksClient {
    pub fn new(url: Url, cache_ttl: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            url,
            http,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            cache_ttl,
        })
    }

    /// Resolve the verification key for `kid`.
    ///
    /// An empty or expired cache is refreshed first. A `kid` missing from a
    /// fresh set is `InvalidHeader`; a failed fetch is `KeySourceUnavailable`.
    #[instrument(skip(self))]
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(cached) = self.current().await
            && cached.is_fresh(self.cache_ttl)
        {
            return cached.lookup(kid);
        }

        let cached = self.refresh().await?;
        cached.lookup(kid)
    }

    async fn current(&self) -> Option<Arc<CachedJwks>> {
        self.cache.read().await.clone()
    }

    async fn refresh(&self) -> Result<Arc<CachedJwks>, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        // another request may have refreshed while we were waiting
        if let Some(cached) = self.current().await
            && cached.is_fresh(self.cache_ttl)
        {
            return Ok(cached);
        }

        let set = self.fetch().await?;
        let fresh = Arc::new(CachedJwks::from_set(&set));

        tracing::info!(url = %self.url, key_count = fresh.keys.len(), "jwks cache refreshed");

        *self.cache.write().await = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %self.url, error = %e, "failed to fetch jwks");
                AuthError::key_source_unavailable("jwks endpoint unreachable")
            })?;

        if !response.status().is_success() {
            tracing::error!(url = %self.url, status = %response.status(), "jwks endpoint returned error");
            return Err(AuthError::key_source_unavailable(
                "jwks endpoint returned an error status",
            ));
        }

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::error!(url = %self.url, error = %e, "failed to parse jwks response");
            AuthError::key_source_unavailable("jwks response is not a key set")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AuthErrorKind;

    #[test]
    fn builds_keys_by_kid_and_skips_keys_without_kid() {
        let set: JwkSet = serde_json::from_str(
            r#"{
                "keys": [
                    {"kty": "OKP", "crv": "Ed25519", "kid": "key-a", "use": "sig",
                     "x": "EbIm1KA2rmaqIMtfwSerQg0GAbvSFWr5iy-82ZXJW3M"},
                    {"kty": "OKP", "crv": "Ed25519",
                     "x": "7P1LGUEVw35MvYvHvrnmmSB3HdUEPiH-0VvHRz9SPAI"}
                ]
            }"#,
        )
        .unwrap();

        let cached = CachedJwks::from_set(&set);
        assert_eq!(cached.keys.len(), 1);
        assert!(cached.lookup("key-a").is_ok());
        assert_eq!(
            cached.lookup("key-b").err().map(|e| e.kind()),
            Some(AuthErrorKind::InvalidHeader)
        );
    }

    #[test]
    fn freshness_follows_ttl() {
        let cached = CachedJwks::from_set(&JwkSet { keys: Vec::new() });
        assert!(cached.is_fresh(Duration::from_secs(60)));
        assert!(!cached.is_fresh(Duration::ZERO));
    }
}
