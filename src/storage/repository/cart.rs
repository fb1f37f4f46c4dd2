// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart repository.
//!
//! One entry per `(user_id, goods_id)` pair, stored under the composite key
//! `user_id|goods_id`. Because the pair is the key itself, an upsert is a
//! single insert and can never produce duplicate entries.

use redb::ReadableDatabase;
use serde::{Deserialize, Serialize};

use crate::storage::database::{make_cart_key, make_cart_prefix, CART_ITEMS};
use crate::storage::{DbResult, ShopDatabase};

/// Cart entry as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCartItem {
    /// Owner of the cart
    pub user_id: String,
    /// Goods in the cart
    pub goods_id: String,
    /// Requested quantity, stored as given
    pub quantity: i64,
}

/// Repository for cart operations.
pub struct CartRepository<'a> {
    db: &'a ShopDatabase,
}

impl<'a> CartRepository<'a> {
    /// Create a new CartRepository.
    pub fn new(db: &'a ShopDatabase) -> Self {
        Self { db }
    }

    /// Get a single cart entry.
    pub fn get(&self, user_id: &str, goods_id: &str) -> DbResult<Option<StoredCartItem>> {
        let key = make_cart_key(user_id, goods_id);
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(CART_ITEMS)?;
        match table.get(key.as_slice())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List every cart entry of a user, ordered by goods_id.
    pub fn list_by_user(&self, user_id: &str) -> DbResult<Vec<StoredCartItem>> {
        let prefix = make_cart_prefix(user_id);
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(CART_ITEMS)?;

        let mut items = Vec::new();
        for entry in table.range(prefix.as_slice()..)? {
            let (key, value) = entry?;
            if !key.value().starts_with(&prefix) {
                break;
            }
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    /// Set the quantity of a cart entry, creating it if absent.
    ///
    /// The quantity replaces any previous value; it is not added to it.
    /// Returns `true` when a new entry was created.
    pub fn upsert(&self, user_id: &str, goods_id: &str, quantity: i64) -> DbResult<bool> {
        let item = StoredCartItem {
            user_id: user_id.to_string(),
            goods_id: goods_id.to_string(),
            quantity,
        };
        let json = serde_json::to_vec(&item)?;
        let key = make_cart_key(user_id, goods_id);

        let write_txn = self.db.raw().begin_write()?;
        let created = {
            let mut table = write_txn.open_table(CART_ITEMS)?;
            let previous = table.insert(key.as_slice(), json.as_slice())?;
            previous.is_none()
        };
        write_txn.commit()?;
        Ok(created)
    }

    /// Remove a cart entry. Returns whether an entry existed.
    pub fn remove(&self, user_id: &str, goods_id: &str) -> DbResult<bool> {
        let key = make_cart_key(user_id, goods_id);

        let write_txn = self.db.raw().begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(CART_ITEMS)?;
            let removed = table.remove(key.as_slice())?;
            removed.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_overwrites_quantity() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let repo = CartRepository::new(&db);

        assert!(repo.upsert("user-1", "goods-1", 3).unwrap());
        assert!(!repo.upsert("user-1", "goods-1", 5).unwrap());

        let items = repo.list_by_user("user-1").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn upsert_accepts_zero_and_negative_quantities() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let repo = CartRepository::new(&db);

        repo.upsert("user-1", "goods-1", 0).unwrap();
        repo.upsert("user-1", "goods-2", -2).unwrap();

        assert_eq!(repo.get("user-1", "goods-1").unwrap().unwrap().quantity, 0);
        assert_eq!(repo.get("user-1", "goods-2").unwrap().unwrap().quantity, -2);
    }

    #[test]
    fn list_by_user_does_not_leak_other_carts() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let repo = CartRepository::new(&db);

        repo.upsert("user-1", "goods-1", 1).unwrap();
        repo.upsert("user-1", "goods-2", 2).unwrap();
        repo.upsert("user-10", "goods-1", 7).unwrap();
        repo.upsert("user-2", "goods-3", 3).unwrap();

        let items = repo.list_by_user("user-1").unwrap();
        let goods: Vec<&str> = items.iter().map(|i| i.goods_id.as_str()).collect();
        assert_eq!(goods, vec!["goods-1", "goods-2"]);
        assert!(items.iter().all(|i| i.user_id == "user-1"));

        assert!(repo.list_by_user("user-3").unwrap().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let repo = CartRepository::new(&db);

        repo.upsert("user-1", "goods-1", 1).unwrap();
        assert!(repo.remove("user-1", "goods-1").unwrap());
        assert!(!repo.remove("user-1", "goods-1").unwrap());
        assert!(repo.get("user-1", "goods-1").unwrap().is_none());
    }
}
