//! Signing-key sources for token verification.
use jsonwebtoken::{Algorithm, DecodingKey};
use thiserror::Error;

use crate::config::KeySourceConfig;
use crate::services::auth::error::AuthError;
use crate::services::auth::jwks::JwksClient;

#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("invalid AUTH_PUBLIC_KEY_PEM for the configured AUTH_ALGORITHM")]
    Key(#[source] jsonwebtoken::errors::Error),
    #[error("failed to build the JWKS http client")]
    HttpClient(#[source] reqwest::Error),
}

pub enum KeySource {
    Static { key_id: String, key: DecodingKey },
    Remote(JwksClient),
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        match self {
            Self::Static { key_id, .. } => f
                .debug_struct("KeySource::Static")
                .field("key_id", key_id)
                .finish(),
            Self::Remote(client) => f.debug_tuple("KeySource::Remote").field(client).finish(),
        }
    }
}

impl KeySource {
    pub fn from_config(
        config: &KeySourceConfig,
        algorithm: Algorithm,
    ) -> Result<Self, KeySourceError> {
        match config {
            KeySourceConfig::Static {
                key_id,
                key_material,
            } => Ok(Self::Static {
                key_id: key_id.clone(),
                key: decoding_key_from_pem(algorithm, key_material)
                    .map_err(KeySourceError::Key)?,
            }),
            KeySourceConfig::Jwks { url, cache_ttl } => {
                let client = JwksClient::new(url.clone(), *cache_ttl)
                    .map_err(KeySourceError::HttpClient)?;
                Ok(Self::Remote(client))
            }
        }
    }

    /// Find the key registered under `kid`.
    pub async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        match self {
            Self::Static { key_id, key } if key_id == kid => Ok(key.clone()),
            Self::Static { .. } => Err(AuthError::invalid_header(
                "unable to find the appropriate key",
            )),
            Self::Remote(client) => client.get_key(kid).await,
        }
    }
}

/// Build a verification key from PEM (or a shared secret for HMAC algorithms).
pub fn decoding_key_from_pem(
    algorithm: Algorithm,
    material: &str,
) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(DecodingKey::from_secret(material.as_bytes()))
        }
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(material.as_bytes()),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(material.as_bytes()),
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(material.as_bytes()),
    }
}
