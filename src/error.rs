// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::DbError;

/// Registration: password and confirmation differ.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "패스워드가 패드워드 확인란과 동일하지 않습니다.";

/// Registration: email or nickname already taken.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "이미 가입된 이메일 또는 닉네임이 있습니다.";

/// Login: unknown email or wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "이메일 또는 패스워드가 잘못됐습니다.";

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error returned by API handlers.
///
/// `message: None` renders an empty `{}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: String,
}

#[derive(Serialize)]
struct EmptyBody {}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// 404 with an empty body.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 with a generic message. The detail is logged, never returned.
    pub fn internal(detail: &str) -> Self {
        tracing::error!(error = %detail, "Internal error while handling request");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        ApiError::internal(&format!("storage error: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.message {
            Some(error_message) => (self.status, Json(ErrorBody { error_message })).into_response(),
            None => (self.status, Json(EmptyBody {})).into_response(),
        }
    }
}
