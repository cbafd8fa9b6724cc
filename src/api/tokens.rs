// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and inspection endpoints.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderName},
};
use chrono::Utc;

use crate::{
    auth::{transport, AuthError, Role, TokenCodec},
    state::AppState,
};

/// Subject the demo issuance endpoint creates tokens for.
pub const DEMO_SUBJECT: &str = "Robbie";

/// Issue a token for the demo principal and store it in the
/// `Authorization` cookie.
pub async fn create_jwt(
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 1], String), AuthError> {
    let token = state
        .tokens
        .create(DEMO_SUBJECT, Role::User.label(), Utc::now())?;

    let cookie = transport::token_cookie(
        &transport::encode(&token),
        state.tokens.ttl().num_seconds(),
    );

    Ok(([(SET_COOKIE, cookie)], format!("createJWT : {token}")))
}

/// Read the token cookie and report its subject and authority.
///
/// Unlike the middleware, this handler answers 401 for a missing prefix or
/// an invalid token.
pub async fn get_jwt(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, AuthError> {
    let encoded = transport::token_from_headers(&headers).ok_or(AuthError::TokenMissing)?;
    let value = transport::decode(&encoded)?;
    let raw = TokenCodec::strip_prefix(&value)?;

    let claims = state.tokens.verify(raw).inspect_err(|err| {
        tracing::warn!(category = err.error_code(), reason = %err, "token inspection failed");
    })?;
    tracing::info!(subject = claims.subject(), authority = claims.authority(), "token inspected");

    Ok(format!("getJWT : {}, {}", claims.subject(), claims.authority()))
}
