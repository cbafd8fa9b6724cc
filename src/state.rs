// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthFailurePolicy, PrincipalResolver, TokenCodec};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub resolver: Arc<dyn PrincipalResolver>,
    pub failure_policy: AuthFailurePolicy,
}

impl AppState {
    pub fn new(tokens: TokenCodec, resolver: impl PrincipalResolver + 'static) -> Self {
        Self {
            tokens: Arc::new(tokens),
            resolver: Arc::new(resolver),
            failure_policy: AuthFailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: AuthFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// State with the test key, `Robbie` as a user and `root` as an admin.
#[cfg(test)]
pub(crate) fn test_state(policy: AuthFailurePolicy) -> AppState {
    use crate::auth::{InMemoryPrincipalResolver, Role, SigningKey};

    let key = SigningKey::from_base64("c3VwZXItc2VjcmV0LWtleS1mb3ItdGVzdGluZy0xMjM=")
        .expect("test key is valid");
    let resolver = InMemoryPrincipalResolver::new()
        .with_principal("Robbie", Role::User)
        .with_principal("root", Role::Admin);

    AppState::new(TokenCodec::new(key), resolver).with_failure_policy(policy)
}
