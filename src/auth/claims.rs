// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the resolved principal.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims carried in a token payload.
///
/// Timestamps are Unix seconds. `exp` is always `iat` plus the token TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Authority label, e.g. `USER`
    pub auth: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn authority(&self) -> &str {
        &self.auth
    }

    /// Strict expiry: a token is expired at the instant `exp` is reached.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Canonical subject identifier (token `sub`)
    pub subject: String,

    /// Role as known to the principal store
    pub role: Role,

    /// Granted authorities
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
            authorities: vec![role.authority().to_string()],
        }
    }

    /// Check if the principal has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims {
            sub: "Robbie".to_string(),
            auth: "USER".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        }
    }

    #[test]
    fn expiry_is_strict() {
        let claims = sample_claims();
        assert!(!claims.is_expired_at(1_700_003_599));
        assert!(claims.is_expired_at(1_700_003_600));
        assert!(claims.is_expired_at(1_700_003_601));
    }

    #[test]
    fn claims_serialize_with_wire_names() {
        let value = serde_json::to_value(sample_claims()).unwrap();
        assert_eq!(value["sub"], "Robbie");
        assert_eq!(value["auth"], "USER");
        assert_eq!(value["iat"], 1_700_000_000);
        assert_eq!(value["exp"], 1_700_003_600);
    }

    #[test]
    fn principal_grants_role_authority() {
        let principal = Principal::new("Robbie", Role::Admin);
        assert_eq!(principal.authorities, vec!["ROLE_ADMIN".to_string()]);
        assert!(principal.is_admin());
        assert!(principal.has_role(Role::User));

        let user = Principal::new("Robbie", Role::User);
        assert!(!user.is_admin());
        assert!(user.has_role(Role::User));
    }
}
