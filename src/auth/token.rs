// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance and verification.
//!
//! Tokens are HS256 JWTs whose only identity claim is `userId`. The signing
//! secret is supplied once at startup from configuration.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::TokenClaims, AuthError};

/// Signing algorithm for all access tokens.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies access tokens with a process-wide secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service for the given HMAC secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Tokens carry no exp/aud; only the signature and algorithm are checked
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token binding `user_id`.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            iat: Utc::now().timestamp(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("token signing failed: {e}")))
    }

    /// Verify a token and return the user ID it binds.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims.user_id)
    }
}
