// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied with `route_layer` to the protected part of the router:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users/me", get(users::get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         auth_middleware,
//!     ));
//! ```
//!
//! On success the resolved [`CurrentUser`] is inserted into the request
//! extensions, where the `Auth` extractor picks it up.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, CurrentUser};
use crate::state::AppState;
use crate::storage::UserRepository;

/// The only accepted authorization scheme (case-sensitive).
const BEARER_SCHEME: &str = "Bearer";

/// Authentication middleware function.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            match &e {
                AuthError::UnknownUser => {
                    tracing::warn!(reason = e.error_code(), "Valid token for a missing user");
                }
                AuthError::InternalError(detail) => {
                    tracing::error!(error = %detail, "Authentication failed internally");
                }
                _ => tracing::debug!(reason = e.error_code(), "Rejected request"),
            }
            e.into_response()
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    // Only the second space-separated field is the token; anything after it is ignored
    let mut fields = auth_str.split(' ');
    let scheme = fields.next().unwrap_or_default();
    let token = fields.next().ok_or(AuthError::InvalidAuthHeader)?;

    if scheme != BEARER_SCHEME {
        return Err(AuthError::UnsupportedScheme);
    }

    Ok(token)
}

/// Verify the bearer token and resolve its user.
///
/// A token that verifies but names a user that no longer exists is rejected
/// with `AuthError::UnknownUser`.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
    let token = bearer_token(headers)?;
    let user_id = state.tokens.verify(token)?;

    let user = UserRepository::new(&state.db)
        .get(&user_id)
        .map_err(|e| AuthError::InternalError(format!("user lookup failed: {e}")))?
        .ok_or(AuthError::UnknownUser)?;

    Ok(CurrentUser::from(user))
}
