// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;

use crate::auth::{AdminOnly, Auth, Principal, Role};

/// Response for GET /api/user/me
#[derive(Debug, Serialize)]
pub struct UserMeResponse {
    /// Token subject
    pub subject: String,
    /// User's role
    pub role: Role,
    /// Granted authorities
    pub authorities: Vec<String>,
}

impl From<Principal> for UserMeResponse {
    fn from(principal: Principal) -> Self {
        Self {
            subject: principal.subject,
            role: principal.role,
            authorities: principal.authorities,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminPingResponse {
    pub status: String,
    pub subject: String,
}

/// Get the current authenticated principal.
pub async fn get_current_user(Auth(principal): Auth) -> Json<UserMeResponse> {
    Json(principal.into())
}

/// Admin-only liveness check.
pub async fn admin_ping(AdminOnly(principal): AdminOnly) -> Json<AdminPingResponse> {
    Json(AdminPingResponse {
        status: "ok".to_string(),
        subject: principal.subject,
    })
}
