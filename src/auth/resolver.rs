// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Principal resolution.
//!
//! After a token has been verified its subject is looked up to load the
//! principal's current role. Account storage lives outside this crate;
//! [`InMemoryPrincipalResolver`] backs the binary and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::claims::Principal;
use super::error::AuthError;
use super::roles::Role;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no principal for subject {0}")]
    NotFound(String),

    #[error("principal store unavailable: {0}")]
    Unavailable(String),
}

impl From<ResolveError> for AuthError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(subject) => AuthError::PrincipalNotFound(subject),
            ResolveError::Unavailable(msg) => AuthError::PrincipalLookup(msg),
        }
    }
}

/// Loads the principal for a verified token subject.
///
/// Implementations may perform I/O and own their own timeout policy.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve_principal(&self, subject: &str) -> Result<Principal, ResolveError>;
}

/// Principal store keyed by subject.
#[derive(Default)]
pub struct InMemoryPrincipalResolver {
    principals: RwLock<HashMap<String, Role>>,
}

impl InMemoryPrincipalResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a principal while building the resolver.
    pub fn with_principal(mut self, subject: impl Into<String>, role: Role) -> Self {
        self.principals.get_mut().insert(subject.into(), role);
        self
    }
}

#[async_trait]
impl PrincipalResolver for InMemoryPrincipalResolver {
    async fn resolve_principal(&self, subject: &str) -> Result<Principal, ResolveError> {
        let principals = self.principals.read().await;
        principals
            .get(subject)
            .map(|role| Principal::new(subject, *role))
            .ok_or_else(|| ResolveError::NotFound(subject.to_string()))
    }
}
