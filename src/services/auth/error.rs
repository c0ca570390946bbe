//! Authorization failures raised by the token validator.
//!
//! The kind is kept for logs and tests only; the HTTP boundary renders every
//! kind with the same generic message.
use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingHeader,
    MalformedHeader,
    InvalidHeader,
    InvalidSignature,
    TokenExpired,
    InvalidClaims,
    Unauthorized,
    KeySourceUnavailable,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidHeader => "invalid_header",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Unauthorized => "unauthorized",
            Self::KeySourceUnavailable => "key_source_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::KeySourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}")]
pub struct AuthError {
    kind: AuthErrorKind,
    detail: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn missing_header(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MissingHeader, detail)
    }

    pub fn malformed_header(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MalformedHeader, detail)
    }

    pub fn invalid_header(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidHeader, detail)
    }

    pub fn invalid_signature(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidSignature, detail)
    }

    pub fn token_expired(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::TokenExpired, detail)
    }

    pub fn invalid_claims(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidClaims, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unauthorized, detail)
    }

    pub fn key_source_unavailable(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::KeySourceUnavailable, detail)
    }
}
