// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Goods catalogue endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::ApiError,
    models::{GoodsListResponse, GoodsQuery, GoodsResponse},
    state::AppState,
    storage::GoodsRepository,
};

/// List goods newest first, optionally filtered by exact category.
#[utoipa::path(
    get,
    path = "/api/goods",
    params(GoodsQuery),
    tag = "Goods",
    security(("bearer" = [])),
    responses(
        (status = 200, body = GoodsListResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_goods(
    State(state): State<AppState>,
    Query(query): Query<GoodsQuery>,
) -> Result<Json<GoodsListResponse>, ApiError> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let goods = GoodsRepository::new(&state.db).list(category)?;
    Ok(Json(GoodsListResponse { goods }))
}

#[utoipa::path(
    get,
    path = "/api/goods/{goods_id}",
    params(
        ("goods_id" = String, Path, description = "Goods identifier")
    ),
    tag = "Goods",
    security(("bearer" = [])),
    responses(
        (status = 200, body = GoodsResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No goods with this identifier"),
    )
)]
pub async fn get_goods(
    State(state): State<AppState>,
    Path(goods_id): Path<String>,
) -> Result<Json<GoodsResponse>, ApiError> {
    let goods = GoodsRepository::new(&state.db)
        .get(&goods_id)?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(GoodsResponse { goods }))
}
