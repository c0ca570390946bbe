use axum::http::HeaderMap;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};

use crate::config::AuthConfig;
use crate::services::auth::{
    bearer,
    claims::{self, Claims, UnverifiedExpiry},
    error::AuthError,
    keys::KeySource,
};

/// Bearer-token validator.
///
/// Holds the expected issuer/audience/algorithm and the key source. Every
/// method is a pure decision over its inputs; the only shared state is the
/// JWKS cache inside `KeySource::Remote`.
pub struct TokenValidator {
    algorithm: Algorithm,
    validation: Validation,
    keys: KeySource,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .field("keys", &self.keys)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(config: &AuthConfig, keys: KeySource) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = config.leeway_seconds;

        Self {
            algorithm: config.algorithm,
            validation,
            keys,
        }
    }

    /// Entry point for protected routes: extract, verify, then authorize.
    pub async fn authorize_request(
        &self,
        headers: &HeaderMap,
        required_permission: &str,
    ) -> Result<Claims, AuthError> {
        let token = bearer::extract_credential(headers)?;
        let claims = self.verify(token).await?;
        self.authorize(&claims, required_permission)?;
        Ok(claims)
    }

    /// Decode and verify a compact JWS.
    ///
    /// Order of checks:
    /// 1. structure + JOSE header (`alg` must match, `kid` must resolve)
    /// 2. `exp`, read from the unverified payload
    /// 3. signature, `iss`, `aud` and required claims
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.split('.').count() != 3 {
            return Err(AuthError::invalid_header(
                "token must be three base64url segments",
            ));
        }

        let header = jsonwebtoken::decode_header(token)
            .map_err(|_| AuthError::invalid_header("unable to parse authentication token"))?;

        if header.alg != self.algorithm {
            return Err(AuthError::invalid_header(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .as_deref()
            .filter(|kid| !kid.is_empty())
            .ok_or_else(|| AuthError::invalid_header("authorization malformed: missing kid"))?;

        let key = self.keys.resolve(kid).await?;

        self.reject_expired(token)?;

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation)
            .map_err(classify_jwt_error)?;

        Ok(data.claims)
    }

    pub fn authorize(&self, claims: &Claims, required_permission: &str) -> Result<(), AuthError> {
        claims::authorize(claims, required_permission)
    }

    /// `exp <= now` is expired, whatever the signature turns out to be.
    fn reject_expired(&self, token: &str) -> Result<(), AuthError> {
        let Some(payload) = token.split('.').nth(1) else {
            return Ok(());
        };

        // Undecodable payloads are left to signature verification.
        let Some(expiry) = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<UnverifiedExpiry>(&bytes).ok())
        else {
            return Ok(());
        };

        let Some(exp) = expiry.seconds()? else {
            return Ok(());
        };

        let now = Utc::now().timestamp() as f64;
        if exp <= now {
            return Err(AuthError::token_expired("token expired"));
        }

        Ok(())
    }
}

fn classify_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired("token expired"),
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Json(_) => AuthError::invalid_claims(format!(
            "incorrect claims, please check the audience and issuer: {err}"
        )),
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidToken => {
            AuthError::invalid_header(format!("unable to parse authentication token: {err}"))
        }
        _ => AuthError::invalid_signature(format!("signature verification failed: {err}")),
    }
}
