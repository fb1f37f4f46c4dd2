// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every rejected bearer authentication.
pub const LOGIN_REQUIRED_MESSAGE: &str = "로그인 후 사용하세요";

/// Authentication error type.
///
/// The variants exist for logging only: every 401 variant renders the same
/// response body so clients cannot tell a missing header from a bad
/// signature or a deleted account.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header is not valid text or has no `<scheme> <token>` shape
    InvalidAuthHeader,
    /// Scheme is something other than `Bearer`
    UnsupportedScheme,
    /// Token is malformed, unsigned or uses an unexpected algorithm
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token verified but its user no longer exists
    UnknownUser,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::UnsupportedScheme => "unsupported_scheme",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::UnknownUser => "unknown_user",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::UnsupportedScheme
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::UnknownUser => StatusCode::UNAUTHORIZED,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected '<scheme> <token>')")
            }
            AuthError::UnsupportedScheme => write!(f, "Authorization scheme must be 'Bearer'"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::UnknownUser => write!(f, "Token refers to a user that does not exist"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = if status == StatusCode::UNAUTHORIZED {
            LOGIN_REQUIRED_MESSAGE
        } else {
            "Internal server error"
        };
        (status, Json(AuthErrorBody { error_message })).into_response()
    }
}
