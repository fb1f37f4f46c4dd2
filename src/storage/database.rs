// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded shop database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: email → user_id (unique index)
//! - `users_by_nickname`: nickname → user_id (unique index)
//! - `goods`: goods_id → serialized StoredGoods
//! - `goods_by_date`: composite key (!date_be|goods_id) → goods_id
//! - `cart_items`: composite key (user_id|goods_id) → serialized StoredCartItem
//!
//! redb admits a single write transaction at a time, so any check-then-write
//! sequence done inside one write transaction cannot interleave with another
//! request. Repositories rely on this for the uniqueness constraints.

use std::path::Path;

use redb::{
    backends::InMemoryBackend, Database, ReadableDatabase, ReadableTableMetadata, TableDefinition,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Unique index: email → user_id.
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, &str> =
    TableDefinition::new("users_by_email");

/// Unique index: nickname → user_id.
pub(crate) const USERS_BY_NICKNAME: TableDefinition<&str, &str> =
    TableDefinition::new("users_by_nickname");

/// Primary table: goods_id → StoredGoods (JSON bytes).
pub(crate) const GOODS: TableDefinition<&str, &[u8]> = TableDefinition::new("goods");

/// Index: `!date_be|goods_id` → goods_id, newest first on a forward scan.
pub(crate) const GOODS_BY_DATE: TableDefinition<&[u8], &str> =
    TableDefinition::new("goods_by_date");

/// Primary table: `user_id|goods_id` → StoredCartItem (JSON bytes).
pub(crate) const CART_ITEMS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("cart_items");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

const KEY_SEPARATOR: u8 = b'|';

/// Build the composite key for the goods_by_date table.
///
/// Format: `inverted_timestamp_be_bytes | goods_id`. Timestamps are mapped to
/// an order-preserving unsigned value first so pre-epoch dates still sort
/// correctly, then inverted so the newest goods come first on a forward scan.
pub(crate) fn make_goods_date_key(timestamp_millis: i64, goods_id: &str) -> Vec<u8> {
    let ordered = (timestamp_millis as u64) ^ (1 << 63);
    let mut key = Vec::with_capacity(8 + 1 + goods_id.len());
    key.extend_from_slice(&(!ordered).to_be_bytes());
    key.push(KEY_SEPARATOR);
    key.extend_from_slice(goods_id.as_bytes());
    key
}

/// Build the composite key for a cart entry.
///
/// Format: `user_id | goods_id`. User ids are UUIDs and never contain the
/// separator, so a `user_id|` prefix selects exactly one user's cart.
pub(crate) fn make_cart_key(user_id: &str, goods_id: &str) -> Vec<u8> {
    let mut key = make_cart_prefix(user_id);
    key.extend_from_slice(goods_id.as_bytes());
    key
}

/// Build the prefix for range scanning all cart entries of a user.
pub(crate) fn make_cart_prefix(user_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(user_id.len() + 1);
    prefix.extend_from_slice(user_id.as_bytes());
    prefix.push(KEY_SEPARATOR);
    prefix
}

// =============================================================================
// ShopDatabase
// =============================================================================

/// Embedded ACID document store for users, goods and carts.
pub struct ShopDatabase {
    db: Database,
}

impl ShopDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::with_tables(db)
    }

    /// Open a database that lives only in memory.
    pub fn open_in_memory() -> DbResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_tables(db)
    }

    fn with_tables(db: Database) -> DbResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(USERS_BY_NICKNAME)?;
            let _ = write_txn.open_table(GOODS)?;
            let _ = write_txn.open_table(GOODS_BY_DATE)?;
            let _ = write_txn.open_table(CART_ITEMS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Access the underlying redb handle.
    pub(crate) fn raw(&self) -> &Database {
        &self.db
    }

    /// Check that a read transaction can be opened and a table read.
    pub fn health_check(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let _ = table.len()?;
        Ok(())
    }
}
