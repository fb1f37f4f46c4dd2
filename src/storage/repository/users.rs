// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are stored as JSON documents keyed by `user_id`. Email and nickname
//! each have a unique index table; [`UserRepository::create`] checks and
//! writes both indexes inside the same write transaction.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use crate::storage::database::{USERS, USERS_BY_EMAIL, USERS_BY_NICKNAME};
use crate::storage::{DbError, DbResult, ShopDatabase};

/// User record as persisted.
///
/// Only the Argon2id PHC hash of the password is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID v4)
    pub user_id: String,
    /// Login email, unique across users
    pub email: String,
    /// Display name, unique across users
    pub nickname: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Build a new user record with a freshly generated id.
    pub fn new(email: String, nickname: String, password_hash: String) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            email,
            nickname,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a ShopDatabase,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a ShopDatabase) -> Self {
        Self { db }
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Find a user by exact email.
    pub fn find_by_email(&self, email: &str) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.raw().begin_read()?;
        let index = read_txn.open_table(USERS_BY_EMAIL)?;
        let user_id = match index.get(email)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let table = read_txn.open_table(USERS)?;
        match table.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => {
                tracing::warn!(user_id = %user_id, "Email index points at a missing user");
                Ok(None)
            }
        }
    }

    /// Insert a new user.
    ///
    /// # Errors
    /// Returns `DbError::AlreadyExists` when the email or the nickname is
    /// already taken. Nothing is written in that case.
    pub fn create(&self, user: &StoredUser) -> DbResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.raw().begin_write()?;
        let taken = {
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            let mut by_nickname = write_txn.open_table(USERS_BY_NICKNAME)?;

            let taken = by_email.get(user.email.as_str())?.is_some()
                || by_nickname.get(user.nickname.as_str())?.is_some();

            if !taken {
                by_email.insert(user.email.as_str(), user.user_id.as_str())?;
                by_nickname.insert(user.nickname.as_str(), user.user_id.as_str())?;

                let mut users = write_txn.open_table(USERS)?;
                users.insert(user.user_id.as_str(), json.as_slice())?;
            }
            taken
        };

        if taken {
            write_txn.abort()?;
            return Err(DbError::AlreadyExists("email or nickname".to_string()));
        }

        write_txn.commit()?;
        Ok(())
    }

    /// Remove a user and its index entries. Returns whether a user existed.
    ///
    /// No HTTP endpoint deletes accounts; this exists for maintenance.
    pub fn delete(&self, user_id: &str) -> DbResult<bool> {
        let write_txn = self.db.raw().begin_write()?;
        let existed = {
            let mut users = write_txn.open_table(USERS)?;
            let removed = users
                .remove(user_id)?
                .map(|value| serde_json::from_slice::<StoredUser>(value.value()))
                .transpose()?;

            match removed {
                Some(user) => {
                    let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
                    by_email.remove(user.email.as_str())?;
                    let mut by_nickname = write_txn.open_table(USERS_BY_NICKNAME)?;
                    by_nickname.remove(user.nickname.as_str())?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(existed)
    }
}
