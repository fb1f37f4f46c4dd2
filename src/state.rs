// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::{DbResult, ShopDatabase};

/// Shared state handed to every handler.
///
/// Both members are read-only after startup; the database provides its own
/// transactional isolation.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ShopDatabase>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: ShopDatabase, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }

    /// State over an in-memory database, for tests and local experiments.
    pub fn in_memory(jwt_secret: &[u8]) -> DbResult<Self> {
        Ok(Self::new(
            ShopDatabase::open_in_memory()?,
            TokenService::new(jwt_secret),
        ))
    }
}
