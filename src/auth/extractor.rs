// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is CurrentUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::authenticate, AuthError, CurrentUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Prefers the identity inserted by `auth_middleware`. When a handler is
/// mounted without the middleware, the bearer token is verified here
/// instead, with the same rules and the same rejection.
pub struct Auth(pub CurrentUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authenticate(state, &parts.headers)?;
        Ok(Auth(user))
    }
}
