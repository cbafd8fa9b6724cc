// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request security context.
//!
//! The authentication middleware inserts exactly one `SecurityContext` into
//! every request's extensions. It lives and dies with that request.

use super::claims::Principal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    authentication: Option<Principal>,
}

impl SecurityContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            authentication: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.authentication.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn empty_context_has_no_principal() {
        let context = SecurityContext::empty();
        assert!(context.principal().is_none());
        assert_eq!(context, SecurityContext::default());
    }

    #[test]
    fn authenticated_context_exposes_principal() {
        let context = SecurityContext::authenticated(Principal::new("Robbie", Role::User));
        let principal = context.principal().unwrap();
        assert_eq!(principal.subject, "Robbie");
        assert_eq!(principal.role, Role::User);
    }
}
