// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistence for users, goods and carts in an embedded redb database.
//!
//! ## Layout
//!
//! ```text
//! {DATA_DIR}/shop.redb
//!   users, users_by_email, users_by_nickname
//!   goods, goods_by_date
//!   cart_items
//! ```
//!
//! Handlers never touch redb directly; they go through the repositories in
//! [`repository`], each of which runs every operation in its own
//! transaction.

pub mod database;
pub mod repository;
pub mod seed;

pub use database::{DbError, DbResult, ShopDatabase};
pub use repository::{
    CartRepository, GoodsRepository, StoredCartItem, StoredGoods, StoredUser, UserRepository,
};
pub use seed::{seed_goods_from_file, SeedError};
