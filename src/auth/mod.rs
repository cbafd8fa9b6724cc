// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication.
//!
//! ## Token Lifecycle
//!
//! 1. At startup the base64 secret is decoded into a [`SigningKey`]
//! 2. On issuance a token is created (`sub`, `auth`, `iat`, `exp`), signed
//!    with HS256 and prefixed with `Bearer `
//! 3. The prefixed token is percent-encoded into the `Authorization` cookie
//! 4. On each request the middleware:
//!    - reads and decodes the cookie
//!    - strips the `Bearer ` prefix
//!    - verifies algorithm, signature and expiry
//!    - resolves `sub` to a [`Principal`]
//!    - attaches a [`SecurityContext`] to the request
//!
//! ## Security
//!
//! - Tokens live for 60 minutes, there is no revocation list
//! - Expiry is strict and has no clock skew leeway
//! - Rotating the key requires a restart and invalidates every token

pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod resolver;
pub mod roles;
pub mod token;
pub mod transport;

pub use claims::{Claims, Principal};
pub use context::SecurityContext;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use keys::{KeyInitError, SigningKey};
pub use middleware::{authenticate, AuthFailurePolicy};
pub use resolver::{InMemoryPrincipalResolver, PrincipalResolver, ResolveError};
pub use roles::Role;
pub use token::{TokenCodec, BEARER_PREFIX, TOKEN_TTL_SECS};
