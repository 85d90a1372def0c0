/*
 * Responsibility
 * - アプリ共通の ApiError 定義
 * - IntoResponse 実装 (HTTP status / {"Error": ...} envelope)
 * - RepoError / TokenError を統一的に変換
 *
 * Status policy
 * - 認可の失敗 (PermissionDenied / InvalidToken) は 401。理由はクライアントに区別させない
 * - それ以外の handler エラーは全て 400 (storage エラーもメッセージ付きで 400)
 */
use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::TokenError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid id {0:?}")]
    InvalidId(String),
    #[error("unsupported method {0}")]
    UnsupportedMethod(Method),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("permission denied")]
    PermissionDenied,
    #[error("invalid token")]
    InvalidToken,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::PermissionDenied | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::BAD_REQUEST {
            tracing::debug!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
