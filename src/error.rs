/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error envelope)
 * - RepoError / AuthError を統一的に変換
 *
 * Envelope: { "success": false, "error": <status>, "message": <text> }
 * auth 系はどのチェックで落ちたかをクライアントに漏らさない
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("authorization failed: {0}")]
    Auth(#[from] AuthError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable(reason.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(e) => e.status_code(),
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::NotFound => "resource not found",
            AppError::Unprocessable(reason) => {
                tracing::debug!(reason = %reason, "unprocessable request");
                "unprocessable"
            }
            AppError::Auth(_) => "Authorization failed",
            AppError::Internal => "internal server error",
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::unprocessable("title already exists"),
            RepoError::Db(_) | RepoError::CorruptRecipe(_) => {
                tracing::error!(error = ?e, "drink repository failure");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::{AuthError, AuthErrorKind};

    #[test]
    fn auth_errors_keep_their_status() {
        let forbidden = AppError::from(AuthError::unauthorized("nope"));
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let missing = AppError::from(AuthError::new(AuthErrorKind::MissingHeader, "none"));
        assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn conflict_becomes_unprocessable() {
        let err = AppError::from(RepoError::Conflict);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
