// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token creation and verification.
//!
//! ## Token Format
//!
//! ```text
//! Bearer base64url({"typ":"JWT","alg":"HS256"})
//!       .base64url({"sub":..,"auth":..,"iat":..,"exp":..})
//!       .base64url(HMAC-SHA256(header.payload, key))
//! ```
//!
//! Expiry is checked here rather than by `jsonwebtoken`, so that it is
//! strict (`now >= exp` is expired), has no leeway, and can be evaluated
//! against an explicit instant.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, errors::ErrorKind, Algorithm, Header, Validation};

use super::claims::Claims;
use super::error::AuthError;
use super::keys::SigningKey;

/// Scheme prefix in front of every issued token.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Token lifetime (60 minutes).
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Creates and verifies signed tokens with a single immutable key.
#[derive(Debug)]
pub struct TokenCodec {
    key: SigningKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key,
            validation,
            ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a signed token for `subject`, prefixed with `Bearer `.
    pub fn create(
        &self,
        subject: &str,
        authority: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            auth: authority.to_string(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, self.key.encoding_key())
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))?;

        Ok(format!("{BEARER_PREFIX}{token}"))
    }

    /// Remove the `Bearer ` prefix.
    ///
    /// Blank input or input without the exact, case-sensitive prefix is
    /// `TokenMissing`.
    pub fn strip_prefix(value: &str) -> Result<&str, AuthError> {
        if value.trim().is_empty() {
            return Err(AuthError::TokenMissing);
        }
        value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::TokenMissing)
    }

    /// Verify structure, algorithm, signature and expiry at `now`.
    pub fn verify_at(&self, raw: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        if raw.trim().is_empty() {
            return Err(AuthError::TokenClaimsInvalid);
        }

        let header = decode_header(raw).map_err(|_| AuthError::TokenMalformed)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::TokenUnsupportedAlgorithm);
        }

        let data = decode::<Claims>(raw, self.key.decoding_key(), &self.validation)
            .map_err(classify)?;

        if data.claims.is_expired_at(now.timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }

    pub fn verify(&self, raw: &str) -> Result<Claims, AuthError> {
        self.verify_at(raw, Utc::now())
    }

    /// Boolean form of [`verify_at`](Self::verify_at). The failure
    /// category is logged and then dropped.
    pub fn validate_at(&self, raw: &str, now: DateTime<Utc>) -> bool {
        match self.verify_at(raw, now) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(category = err.error_code(), reason = %err, "JWT validation failed");
                false
            }
        }
    }

    pub fn validate(&self, raw: &str) -> bool {
        self.validate_at(raw, Utc::now())
    }

    /// Extract the claims of a token. Verifies again, so an unvalidated or
    /// expired token yields an error instead of unverified data.
    pub fn parse_claims(&self, raw: &str) -> Result<Claims, AuthError> {
        self.verify(raw)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingAlgorithm
        | ErrorKind::InvalidAlgorithmName => AuthError::TokenUnsupportedAlgorithm,
        ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) => AuthError::TokenClaimsInvalid,
        _ => AuthError::TokenMalformed,
    }
}
