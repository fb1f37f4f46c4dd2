// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart endpoints. Every operation is scoped to the authenticated user.

use axum::{
    extract::{Path, State},
    Json,
};

use super::extract::JsonOrForm;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{CartEntry, CartResponse, EmptyResponse, UpsertCartRequest},
    state::AppState,
    storage::{CartRepository, GoodsRepository},
};

#[utoipa::path(
    get,
    path = "/api/goods/cart",
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, body = CartResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_cart(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<CartResponse>, ApiError> {
    let items = CartRepository::new(&state.db).list_by_user(&user.user_id)?;
    let mut goods = GoodsRepository::new(&state.db)
        .get_many(items.iter().map(|item| item.goods_id.as_str()))?;

    let cart = items
        .into_iter()
        .map(|item| CartEntry {
            quantity: item.quantity,
            goods: goods.remove(&item.goods_id),
        })
        .collect();

    Ok(Json(CartResponse { cart }))
}

/// Set the quantity of one goods in the cart, creating the entry if needed.
#[utoipa::path(
    put,
    path = "/api/goods/{goods_id}/cart",
    params(
        ("goods_id" = String, Path, description = "Goods to put in the cart")
    ),
    request_body = UpsertCartRequest,
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, body = EmptyResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn upsert_cart_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(goods_id): Path<String>,
    JsonOrForm(request): JsonOrForm<UpsertCartRequest>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let created =
        CartRepository::new(&state.db).upsert(&user.user_id, &goods_id, request.quantity)?;
    tracing::debug!(
        user_id = %user.user_id,
        goods_id = %goods_id,
        quantity = request.quantity,
        created,
        "Cart entry written"
    );
    Ok(Json(EmptyResponse {}))
}

/// Remove one goods from the cart. Removing an absent entry also succeeds.
#[utoipa::path(
    delete,
    path = "/api/goods/{goods_id}/cart",
    params(
        ("goods_id" = String, Path, description = "Goods to remove from the cart")
    ),
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, body = EmptyResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn delete_cart_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(goods_id): Path<String>,
) -> Result<Json<EmptyResponse>, ApiError> {
    CartRepository::new(&state.db).remove(&user.user_id, &goods_id)?;
    Ok(Json(EmptyResponse {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentUser;
    use crate::storage::StoredGoods;
    use chrono::{TimeZone, Utc};

    fn user(user_id: &str) -> Auth {
        Auth(CurrentUser {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            nickname: user_id.to_string(),
        })
    }

    fn goods(goods_id: &str) -> StoredGoods {
        StoredGoods {
            goods_id: goods_id.to_string(),
            name: format!("goods {goods_id}"),
            thumbnail_url: String::new(),
            category: "drink".to_string(),
            price: 1000.0,
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    async fn put(state: &AppState, user_id: &str, goods_id: &str, quantity: i64) {
        upsert_cart_item(
            user(user_id),
            State(state.clone()),
            Path(goods_id.to_string()),
            JsonOrForm(UpsertCartRequest { quantity }),
        )
        .await
        .expect("upsert succeeds");
    }

    #[tokio::test]
    async fn empty_cart_lists_nothing() {
        let state = AppState::in_memory(b"test-secret").unwrap();
        let Json(response) = list_cart(user("u1"), State(state)).await.unwrap();
        assert!(response.cart.is_empty());
    }

    #[tokio::test]
    async fn repeated_upsert_overwrites_quantity() {
        let state = AppState::in_memory(b"test-secret").unwrap();
        GoodsRepository::new(&state.db).upsert(&goods("g1")).unwrap();

        put(&state, "u1", "g1", 3).await;
        put(&state, "u1", "g1", 5).await;

        let Json(response) = list_cart(user("u1"), State(state)).await.unwrap();
        assert_eq!(
            response.cart,
            vec![CartEntry {
                quantity: 5,
                goods: Some(goods("g1")),
            }]
        );
    }

    #[tokio::test]
    async fn missing_goods_is_listed_as_none() {
        let state = AppState::in_memory(b"test-secret").unwrap();
        put(&state, "u1", "gone", 0).await;

        let Json(response) = list_cart(user("u1"), State(state)).await.unwrap();
        assert_eq!(response.cart.len(), 1);
        assert_eq!(response.cart[0].quantity, 0);
        assert_eq!(response.cart[0].goods, None);
    }

    #[tokio::test]
    async fn carts_are_private_to_their_owner() {
        let state = AppState::in_memory(b"test-secret").unwrap();
        put(&state, "u1", "g1", 1).await;

        let Json(other) = list_cart(user("u2"), State(state.clone())).await.unwrap();
        assert!(other.cart.is_empty());

        delete_cart_item(user("u2"), State(state.clone()), Path("g1".to_string()))
            .await
            .unwrap();
        let Json(owner) = list_cart(user("u1"), State(state)).await.unwrap();
        assert_eq!(owner.cart.len(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let state = AppState::in_memory(b"test-secret").unwrap();
        put(&state, "u1", "g1", 2).await;

        for _ in 0..2 {
            let Json(body) =
                delete_cart_item(user("u1"), State(state.clone()), Path("g1".to_string()))
                    .await
                    .unwrap();
            assert_eq!(body, EmptyResponse {});
        }

        let Json(response) = list_cart(user("u1"), State(state)).await.unwrap();
        assert!(response.cart.is_empty());
    }
}
