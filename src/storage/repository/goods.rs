// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Goods repository.
//!
//! Goods are read-only through the HTTP API; they enter the database through
//! [`GoodsRepository::upsert`] (used by the startup seed loader). A secondary
//! `goods_by_date` index keeps listings in date-descending order without
//! sorting in memory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::database::{make_goods_date_key, GOODS, GOODS_BY_DATE};
use crate::storage::{DbResult, ShopDatabase};

/// Goods record, stored and returned to clients as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredGoods {
    /// Unique goods identifier
    pub goods_id: String,
    /// Display name
    pub name: String,
    /// Thumbnail image URL
    #[serde(default)]
    pub thumbnail_url: String,
    /// Category used for filtering (exact match)
    pub category: String,
    /// Unit price
    #[serde(default)]
    pub price: f64,
    /// Listing date; lists are sorted newest first
    pub date: DateTime<Utc>,
}

/// Repository for goods operations.
pub struct GoodsRepository<'a> {
    db: &'a ShopDatabase,
}

impl<'a> GoodsRepository<'a> {
    /// Create a new GoodsRepository.
    pub fn new(db: &'a ShopDatabase) -> Self {
        Self { db }
    }

    /// Get goods by ID.
    pub fn get(&self, goods_id: &str) -> DbResult<Option<StoredGoods>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(GOODS)?;
        match table.get(goods_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fetch several goods in one read transaction, keyed by goods_id.
    ///
    /// Ids with no stored goods are simply absent from the returned map.
    pub fn get_many<'id, I>(&self, goods_ids: I) -> DbResult<HashMap<String, StoredGoods>>
    where
        I: IntoIterator<Item = &'id str>,
    {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(GOODS)?;

        let mut found = HashMap::new();
        for goods_id in goods_ids {
            if found.contains_key(goods_id) {
                continue;
            }
            if let Some(value) = table.get(goods_id)? {
                let goods: StoredGoods = serde_json::from_slice(value.value())?;
                found.insert(goods_id.to_string(), goods);
            }
        }
        Ok(found)
    }

    /// List goods newest first, optionally restricted to one category.
    pub fn list(&self, category: Option<&str>) -> DbResult<Vec<StoredGoods>> {
        let read_txn = self.db.raw().begin_read()?;
        let index = read_txn.open_table(GOODS_BY_DATE)?;
        let table = read_txn.open_table(GOODS)?;

        let mut goods = Vec::new();
        for entry in index.iter()? {
            let (_, goods_id) = entry?;
            let goods_id = goods_id.value();

            let Some(value) = table.get(goods_id)? else {
                tracing::warn!(goods_id = %goods_id, "Date index points at missing goods");
                continue;
            };
            let item: StoredGoods = serde_json::from_slice(value.value())?;

            if category.is_none_or(|c| c == item.category) {
                goods.push(item);
            }
        }
        Ok(goods)
    }

    /// Insert or replace goods, keeping the date index in step.
    pub fn upsert(&self, goods: &StoredGoods) -> DbResult<()> {
        let json = serde_json::to_vec(goods)?;
        let new_key = make_goods_date_key(goods.date.timestamp_millis(), &goods.goods_id);

        let write_txn = self.db.raw().begin_write()?;
        {
            let mut table = write_txn.open_table(GOODS)?;
            let previous = table
                .insert(goods.goods_id.as_str(), json.as_slice())?
                .map(|value| serde_json::from_slice::<StoredGoods>(value.value()))
                .transpose()?;

            let mut index = write_txn.open_table(GOODS_BY_DATE)?;
            if let Some(previous) = previous {
                let old_key =
                    make_goods_date_key(previous.date.timestamp_millis(), &previous.goods_id);
                index.remove(old_key.as_slice())?;
            }
            index.insert(new_key.as_slice(), goods.goods_id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
