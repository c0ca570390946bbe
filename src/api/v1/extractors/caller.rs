use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{AuthError, Claims};

/// Handler で検証済み Claims を受け取るための extractor
///
/// `middleware::auth::access::guard` が Claims を extensions に insert 済みである前提。
/// 見つからない場合は 401 (guard が掛かっていない route で使われた)。
#[derive(Debug, Clone)]
pub struct Caller(pub Claims);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| AuthError::missing_header("route is not guarded").into())
    }
}
