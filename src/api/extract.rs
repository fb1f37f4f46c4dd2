// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request body extractor accepting JSON or urlencoded forms.

use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Deserializes the body as `application/x-www-form-urlencoded` when the
/// request says so, and as JSON otherwise.
///
/// Rejections keep axum's status code and message, wrapped in the usual
/// `{"errorMessage": ...}` body.
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.trim_start().starts_with(FORM_CONTENT_TYPE))
}

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
        Ok(Self(value))
    }
}
