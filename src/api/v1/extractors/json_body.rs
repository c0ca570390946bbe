use std::marker::PhantomData;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Json<T>` with rejections mapped onto the API error envelope.
///
/// - no JSON body (missing `content-type: application/json`) → 404
/// - unparseable or wrongly shaped JSON → 422
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

/// Buffered body whose JSON is decoded only when the handler asks for it.
///
/// Lets a handler answer 404 for an unknown resource before the body shape is
/// looked at. `parse` maps failures the same way as `JsonBody`.
#[derive(Debug)]
pub struct DeferredJson<T> {
    is_json: bool,
    bytes: Bytes,
    _target: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> DeferredJson<T> {
    pub fn parse(&self) -> Result<T, AppError> {
        if !self.is_json {
            return Err(AppError::NotFound);
        }
        Json::<T>::from_bytes(&self.bytes)
            .map(|Json(value)| value)
            .map_err(map_rejection)
    }
}

impl<S, T> FromRequest<S> for DeferredJson<T>
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::unprocessable(rejection.body_text()))?;

        Ok(Self {
            is_json,
            bytes,
            _target: PhantomData,
        })
    }
}

fn map_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::NotFound,
        rejection => AppError::unprocessable(rejection.body_text()),
    }
}

// application/json, application/*+json (parameters ignored)
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
