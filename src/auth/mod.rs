// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the shop API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/auth` checks email and password against the stored
//!    Argon2id hash and returns an HS256 token binding the `userId`
//! 2. Clients send `Authorization: Bearer <token>`
//! 3. `auth_middleware` on protected routes:
//!    - verifies the token signature (no expiry is carried)
//!    - loads the user named by `userId`
//!    - inserts [`CurrentUser`] into the request extensions
//! 4. Handlers take the identity with the [`Auth`] extractor
//!
//! Every rejection is a 401 with the same fixed body.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{CurrentUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::auth_middleware;
pub use token::TokenService;
