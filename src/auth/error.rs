// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// The token variants are recovered inside the request gate and only
/// become responses when a handler or the `reject` failure policy asks for
/// it. `error_code` doubles as the `category` field in log lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Transport value is blank or lacks the `Bearer ` prefix
    #[error("Not Found Token")]
    TokenMissing,
    /// Token is not three well-formed base64url segments
    #[error("Token is malformed")]
    TokenMalformed,
    /// Signature does not match header and payload
    #[error("Invalid JWT signature")]
    TokenSignatureInvalid,
    /// `exp` has been reached
    #[error("Expired JWT token")]
    TokenExpired,
    /// Header names an algorithm other than HS256
    #[error("Unsupported JWT token")]
    TokenUnsupportedAlgorithm,
    /// Claims are empty, missing or of the wrong shape
    #[error("JWT claims are empty or invalid")]
    TokenClaimsInvalid,
    /// Cookie value carries a malformed percent-escape
    #[error("Failed to decode token transport value: {0}")]
    TransportDecode(String),
    /// Token subject is unknown to the principal resolver
    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),
    /// Principal resolver failed for another reason
    #[error("Principal lookup failed: {0}")]
    PrincipalLookup(String),
    /// Handler requires a principal but the request has none
    #[error("Authentication is required")]
    Unauthenticated,
    /// Principal lacks the role required by the handler
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
    /// Token could not be produced
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenMissing => "missing_token",
            AuthError::TokenMalformed => "malformed_token",
            AuthError::TokenSignatureInvalid => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenUnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::TokenClaimsInvalid => "invalid_claims",
            AuthError::TransportDecode(_) => "transport_decode_error",
            AuthError::PrincipalNotFound(_) => "principal_not_found",
            AuthError::PrincipalLookup(_) => "principal_lookup_failed",
            AuthError::Unauthenticated => "authentication_required",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureInvalid
            | AuthError::TokenExpired
            | AuthError::TokenUnsupportedAlgorithm
            | AuthError::TokenClaimsInvalid
            | AuthError::TransportDecode(_)
            | AuthError::PrincipalNotFound(_)
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::PrincipalLookup(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
