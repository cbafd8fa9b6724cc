// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET_KEY` | Base64 HS256 signing secret (at least 32 bytes decoded) | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_FAILURE_POLICY` | `forward` or `reject` for unusable tokens | `forward` |
//! | `SEED_ADMIN_USER` | Username registered with the `ADMIN` role | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, fmt, net::SocketAddr};

use crate::auth::AuthFailurePolicy;

/// Environment variable holding the base64 signing secret.
///
/// The secret is decoded once; rotating it requires a restart.
pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH_FAILURE_POLICY_ENV: &str = "AUTH_FAILURE_POLICY";
pub const SEED_ADMIN_USER_ENV: &str = "SEED_ADMIN_USER";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub failure_policy: AuthFailurePolicy,
    pub seed_admin: Option<String>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET_KEY_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_KEY_ENV))?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: PORT_ENV,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_PORT,
        };

        let failure_policy = match lookup(AUTH_FAILURE_POLICY_ENV) {
            Some(value) => value.parse().map_err(|e: crate::auth::middleware::ParsePolicyError| {
                ConfigError::Invalid {
                    var: AUTH_FAILURE_POLICY_ENV,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => AuthFailurePolicy::default(),
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                    reason: "expected \"json\" or \"pretty\"".to_string(),
                })
            }
        };

        let seed_admin = lookup(SEED_ADMIN_USER_ENV).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host,
            port,
            jwt_secret,
            failure_policy,
            seed_admin,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: HOST_ENV,
                value: self.host.clone(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("failure_policy", &self.failure_policy)
            .field("seed_admin", &self.seed_admin)
            .field("log_format", &self.log_format)
            .finish()
    }
}
