//! Verified access-token claims.
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::services::auth::error::AuthError;

/// `aud` may be a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(aud) => aud == audience,
            Self::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Claims of a verified access token.
///
/// Decoded once by `TokenValidator::verify`; `iss`, `aud` and `exp` are
/// guaranteed to have been checked at that point. `permissions` stays optional
/// so that its absence can be reported by `authorize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: Audience,
    #[serde(deserialize_with = "numeric_date")]
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<String>>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|granted| granted.contains(permission))
    }
}

/// Check that `claims` grants `required_permission`.
pub fn authorize(claims: &Claims, required_permission: &str) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or_else(|| AuthError::invalid_claims("permissions not included in token"))?;

    if !granted.contains(required_permission) {
        return Err(AuthError::unauthorized(format!(
            "permission {required_permission:?} not granted"
        )));
    }

    Ok(())
}

/// NumericDate (RFC 7519 §2): fractional seconds are truncated.
fn numeric_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(secs) = value.as_u64() {
        return Ok(secs);
    }
    match value.as_f64() {
        Some(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs.trunc() as u64),
        _ => Err(D::Error::custom(format!("invalid NumericDate {value}"))),
    }
}

fn optional_numeric_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    numeric_date(deserializer).map(Some)
}

/// Unverified view of the payload, used only to reject expired tokens early.
#[derive(Debug, Deserialize)]
pub(crate) struct UnverifiedExpiry {
    #[serde(default)]
    pub exp: Option<serde_json::Value>,
}

impl UnverifiedExpiry {
    /// `Ok(None)` when `exp` is absent; the required-claim check reports that.
    pub fn seconds(&self) -> Result<Option<f64>, AuthError> {
        match &self.exp {
            None => Ok(None),
            Some(exp) => exp
                .as_f64()
                .filter(|secs| secs.is_finite())
                .map(Some)
                .ok_or_else(|| AuthError::invalid_claims("exp must be a NumericDate")),
        }
    }
}
