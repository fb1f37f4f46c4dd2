// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated identity attached to requests.

use serde::{Deserialize, Serialize};

use crate::storage::StoredUser;

/// Claims carried by an access token.
///
/// Tokens carry no expiry; a token stays valid for as long as the signing
/// secret is unchanged and the user exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject user ID
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,
}

/// Identity resolved by the auth middleware.
///
/// Inserted into request extensions and read by the `Auth` extractor. It
/// never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
}

impl From<StoredUser> for CurrentUser {
    fn from(user: StoredUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            nickname: user.nickname,
        }
    }
}
