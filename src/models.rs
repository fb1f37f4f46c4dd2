// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the shop API. Field names follow the
//! camelCase wire format (`confirmPassword`, `goodsId`, ...). Every response
//! is built field by field from storage records, so nothing stored (such as
//! a password hash) reaches a client by accident.
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login, current user
//! - **Cart**: cart listing and quantity updates
//! - **Goods**: catalogue listing and lookup

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::CurrentUser;
use crate::storage::StoredGoods;

/// Body of a successful request with nothing to report: `{}`.
#[derive(Debug, Clone, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct EmptyResponse {}

// =============================================================================
// Account Models
// =============================================================================

/// Request to create an account.
///
/// Missing fields read as empty strings, so the handler's own checks decide
/// the response.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nickname: String,
    pub email: String,
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

/// Request to log in. Missing fields read as empty strings.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Access token returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Send back as `Authorization: Bearer <token>`.
    pub token: String,
}

/// Public profile of the current user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub nickname: String,
}

impl From<CurrentUser> for UserProfile {
    fn from(user: CurrentUser) -> Self {
        Self {
            email: user.email,
            nickname: user.nickname,
        }
    }
}

/// Response for GET /api/users/me
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMeResponse {
    pub user: UserProfile,
}

// =============================================================================
// Cart Models
// =============================================================================

/// Request to set the quantity of one goods in the cart.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertCartRequest {
    /// Replaces the previous quantity. Not validated.
    pub quantity: i64,
}

/// One cart line joined with its goods.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct CartEntry {
    pub quantity: i64,
    /// `null` when the goods no longer exists.
    pub goods: Option<StoredGoods>,
}

/// Response for GET /api/goods/cart
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartResponse {
    pub cart: Vec<CartEntry>,
}

// =============================================================================
// Goods Models
// =============================================================================

/// Query parameters for GET /api/goods
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct GoodsQuery {
    /// Exact category to filter by; empty means no filter.
    pub category: Option<String>,
}

/// Response for GET /api/goods
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoodsListResponse {
    pub goods: Vec<StoredGoods>,
}

/// Response for GET /api/goods/{goods_id}
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoodsResponse {
    pub goods: StoredGoods,
}
