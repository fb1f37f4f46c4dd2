// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::extract::JsonOrForm;
use crate::{
    auth::{password::hash_password, Auth},
    error::{ApiError, DUPLICATE_ACCOUNT_MESSAGE, PASSWORD_MISMATCH_MESSAGE},
    models::{EmptyResponse, RegisterRequest, UserMeResponse},
    state::AppState,
    storage::{DbError, StoredUser, UserRepository},
};

/// Register a new account.
///
/// Email and nickname must both be unused. The password is stored as an
/// Argon2id hash only.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created", body = EmptyResponse),
        (status = 400, description = "Password mismatch or duplicate email/nickname"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<RegisterRequest>,
) -> Result<(StatusCode, Json<EmptyResponse>), ApiError> {
    if request.password != request.confirm_password {
        return Err(ApiError::bad_request(PASSWORD_MISMATCH_MESSAGE));
    }

    let RegisterRequest {
        nickname,
        email,
        password,
        ..
    } = request;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(&format!("hashing task failed: {e}")))?
        .map_err(|e| ApiError::internal(&e.to_string()))?;

    let user = StoredUser::new(email, nickname, password_hash);
    match UserRepository::new(&state.db).create(&user) {
        Ok(()) => {
            tracing::info!(user_id = %user.user_id, "User registered");
            Ok((StatusCode::CREATED, Json(EmptyResponse {})))
        }
        Err(DbError::AlreadyExists(_)) => Err(ApiError::bad_request(DUPLICATE_ACCOUNT_MESSAGE)),
        Err(e) => Err(e.into()),
    }
}

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(UserMeResponse { user: user.into() })
}
