//! `Authorization: Bearer <token>` extraction.
use axum::http::{HeaderMap, header};

use crate::services::auth::error::AuthError;

/// Read the bearer credential from the request headers.
///
/// The header must be exactly two whitespace-separated parts, the first one
/// being the `Bearer` scheme (case-insensitive).
pub fn extract_credential(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AuthError::missing_header("authorization header is expected"))?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::malformed_header("authorization header is not visible ascii"))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::malformed_header("authorization header must start with \"Bearer\""),
        ),
        (Some(_), None, _) => Err(AuthError::malformed_header("token not found")),
        _ => Err(AuthError::malformed_header(
            "authorization header must be bearer token",
        )),
    }
}
