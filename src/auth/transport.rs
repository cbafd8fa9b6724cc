// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie transport for bearer tokens.
//!
//! Cookie values cannot hold spaces, so the `Bearer <token>` string is
//! percent-encoded before it is stored and decoded again on read.
//!
//! - Unreserved: `A-Z a-z 0-9 . - * _`
//! - Everything else becomes `%XX` (uppercase hex over UTF-8 bytes)
//! - A space is always `%20`; a literal `+` is always `%2B`

use std::borrow::Cow;

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::error::AuthError;

/// Cookie (and fallback header) name carrying the token.
pub const AUTHORIZATION_COOKIE: &str = "Authorization";

/// Cookie path scope.
pub const COOKIE_PATH: &str = "/";

const TRANSPORT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'*')
    .remove(b'_');

/// Percent-encode a value for a single-line cookie or header field.
pub fn encode(raw: &str) -> String {
    // Space is in TRANSPORT_SET, so it is emitted as %20 and never as `+`.
    utf8_percent_encode(raw, TRANSPORT_SET).to_string()
}

/// Reverse [`encode`].
///
/// `+` reads as a space. A `%` not followed by two hex digits, or escapes
/// that do not form UTF-8, are `TransportDecode` errors.
pub fn decode(value: &str) -> Result<String, AuthError> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(|b| b.is_ascii_hexdigit()));
            if !well_formed {
                return Err(AuthError::TransportDecode(format!(
                    "incomplete escape at byte {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| AuthError::TransportDecode(e.to_string()))
}

/// Build the `Set-Cookie` value for an already encoded token.
pub fn token_cookie(encoded: &str, max_age_secs: i64) -> String {
    format!(
        "{AUTHORIZATION_COOKIE}={encoded}; Path={COOKIE_PATH}; Max-Age={max_age_secs}; HttpOnly"
    )
}

/// Find the still-encoded token value on a request.
///
/// The `Authorization` cookie wins; without it the `Authorization` header
/// is used.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, AUTHORIZATION_COOKIE).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    })
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}
