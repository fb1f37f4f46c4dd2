// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Goods catalogue seeding.
//!
//! The API has no endpoint for creating goods, so the catalogue is loaded at
//! startup from a JSON file holding an array of goods documents:
//!
//! ```json
//! [
//!   {
//!     "goodsId": "1",
//!     "name": "Americano",
//!     "thumbnailUrl": "https://cdn.example.com/americano.png",
//!     "category": "drink",
//!     "price": 4.5,
//!     "date": "2024-01-01T00:00:00Z"
//!   }
//! ]
//! ```
//!
//! Seeding is an upsert per goods id, so re-running it with the same file is
//! harmless.

use std::path::Path;

use super::{DbError, GoodsRepository, ShopDatabase, StoredGoods};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to store goods: {0}")]
    Db(#[from] DbError),
}

/// Parse goods documents from a JSON array.
pub fn parse_goods(json: &str) -> Result<Vec<StoredGoods>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Load the seed file at `path` into the database.
///
/// Returns the number of goods written.
pub fn seed_goods_from_file(db: &ShopDatabase, path: &Path) -> Result<usize, SeedError> {
    let json = std::fs::read_to_string(path)?;
    let goods = parse_goods(&json)?;

    let repo = GoodsRepository::new(db);
    for item in &goods {
        repo.upsert(item)?;
    }

    tracing::info!(path = %path.display(), count = goods.len(), "Seeded goods catalogue");
    Ok(goods.len())
}
