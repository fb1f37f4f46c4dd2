// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shopping Demo Server - Accounts, Goods Catalogue and Carts
//!
//! A small e-commerce backend: users register and log in for a bearer token,
//! browse goods, and keep a per-user cart. Data lives in an embedded redb
//! database.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, tokens and the authentication middleware
//! - `config` - Environment configuration
//! - `storage` - Embedded database and repositories (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
