// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material.
//!
//! The HMAC secret is configured as a base64 string and decoded exactly once
//! during startup. The resulting [`SigningKey`] is immutable and shared
//! read-only by every token operation.

use std::fmt;

use base64ct::{Base64, Base64Unpadded, Encoding};
use jsonwebtoken::{DecodingKey, EncodingKey};

/// Minimum decoded secret length for HS256 (256 bits).
pub const MIN_KEY_LEN: usize = 32;

/// Fatal key initialization errors. The server must not start on any of these.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyInitError {
    #[error("signing secret is empty")]
    Empty,

    #[error("signing secret is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("signing secret decodes to {len} bytes, at least {min} are required for HS256")]
    TooShort { len: usize, min: usize },
}

/// Decoded HMAC secret with its encoding and decoding keys.
pub struct SigningKey {
    len: usize,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Decode a base64 (standard alphabet) secret. Trailing `=` padding is
    /// optional.
    ///
    /// Surrounding whitespace is ignored so values pasted into env files
    /// with a trailing newline still work.
    pub fn from_base64(secret: &str) -> Result<Self, KeyInitError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(KeyInitError::Empty);
        }

        let bytes = Base64::decode_vec(secret)
            .or_else(|_| Base64Unpadded::decode_vec(secret))
            .map_err(|e| KeyInitError::InvalidBase64(e.to_string()))?;

        if bytes.len() < MIN_KEY_LEN {
            return Err(KeyInitError::TooShort {
                len: bytes.len(),
                min: MIN_KEY_LEN,
            });
        }

        Ok(Self {
            len: bytes.len(),
            encoding: EncodingKey::from_secret(&bytes),
            decoding: DecodingKey::from_secret(&bytes),
        })
    }

    /// Decoded secret length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "c3VwZXItc2VjcmV0LWtleS1mb3ItdGVzdGluZy0xMjM=";

    #[test]
    fn decodes_valid_secret() {
        let key = SigningKey::from_base64(TEST_SECRET).unwrap();
        assert_eq!(key.len(), 32);
        assert!(!key.is_empty());
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let key = SigningKey::from_base64(&format!("  {TEST_SECRET}\n")).unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn accepts_secret_without_padding() {
        let unpadded = TEST_SECRET.trim_end_matches('=');
        let key = SigningKey::from_base64(unpadded).unwrap();
        assert_eq!(key.len(), 32);

        // Same bytes, same signatures.
        let padded = SigningKey::from_base64(TEST_SECRET).unwrap();
        let codec = crate::auth::TokenCodec::new(padded);
        let token = codec.create("Robbie", "USER", chrono::Utc::now()).unwrap();
        let raw = crate::auth::TokenCodec::strip_prefix(&token).unwrap();
        assert!(crate::auth::TokenCodec::new(key).validate(raw));
    }

    #[test]
    fn rejects_invalid_base64() {
        let result = SigningKey::from_base64("not base64 at all!");
        assert!(matches!(result, Err(KeyInitError::InvalidBase64(_))));
    }

    #[test]
    fn rejects_empty_secret() {
        assert_eq!(SigningKey::from_base64("   ").unwrap_err(), KeyInitError::Empty);
    }

    #[test]
    fn rejects_short_secret() {
        // "short-secret"
        let result = SigningKey::from_base64("c2hvcnQtc2VjcmV0");
        assert_eq!(
            result.unwrap_err(),
            KeyInitError::TooShort { len: 12, min: 32 }
        );
    }

    #[test]
    fn debug_does_not_leak_key_bytes() {
        let key = SigningKey::from_base64(TEST_SECRET).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("len: 32"));
        assert!(!rendered.contains("super-secret"));
    }
}
