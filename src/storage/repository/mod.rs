// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the shop database.
//!
//! Each repository provides the operations for one record kind and borrows
//! the [`ShopDatabase`](super::ShopDatabase) for the duration of a request.

pub mod cart;
pub mod goods;
pub mod users;

pub use cart::{CartRepository, StoredCartItem};
pub use goods::{GoodsRepository, StoredGoods};
pub use users::{StoredUser, UserRepository};
