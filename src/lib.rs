// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token Gate - Stateless Bearer Token Authentication
//!
//! Issues HS256-signed bearer tokens, carries them in a percent-encoded
//! `Authorization` cookie and turns a valid token into a per-request
//! security context for downstream handlers.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Key material, token codec, cookie transport, request gate
//! - `config` - Environment configuration
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
