// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{extract::State, Json};

use super::extract::JsonOrForm;
use crate::{
    auth::password::{verify_dummy_password, verify_password},
    error::{ApiError, INVALID_CREDENTIALS_MESSAGE},
    models::{LoginRequest, TokenResponse},
    state::AppState,
    storage::UserRepository,
};

/// Exchange email and password for a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = UserRepository::new(&state.db).find_by_email(&request.email)?;

    let (user, verified) = tokio::task::spawn_blocking(move || match user {
        Some(user) => {
            let verified = verify_password(&request.password, &user.password_hash);
            (Some(user), verified)
        }
        None => (None, verify_dummy_password(&request.password)),
    })
    .await
    .map_err(|e| ApiError::internal(&format!("verification task failed: {e}")))?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("Login rejected");
            return Err(ApiError::bad_request(INVALID_CREDENTIALS_MESSAGE));
        }
    };

    let token = state
        .tokens
        .issue(&user.user_id)
        .map_err(|e| ApiError::internal(&e.to_string()))?;

    tracing::info!(user_id = %user.user_id, "User logged in");
    Ok(Json(TokenResponse { token }))
}
