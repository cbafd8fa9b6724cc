// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication gate.
//!
//! ## Flow
//!
//! 1. Find the `Authorization` cookie (or header). None: anonymous.
//! 2. Percent-decode it. Malformed escapes: treated as no token.
//! 3. Strip the `Bearer ` prefix.
//! 4. Verify algorithm, signature and expiry.
//! 5. Resolve the subject to a principal.
//! 6. Attach an authenticated [`SecurityContext`].
//!
//! Failures in steps 3-5 are logged with their category and then handled
//! by the configured [`AuthFailurePolicy`]. Every request that leaves the
//! gate carries a `SecurityContext` extension, empty unless step 6 ran.
//! Rejecting anonymous requests is up to the handlers (see
//! [`Auth`](super::Auth)).
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
//!     .with_state(state);
//! ```

use std::str::FromStr;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use super::context::SecurityContext;
use super::error::AuthError;
use super::token::TokenCodec;
use super::transport;
use crate::state::AppState;

/// What the gate does with a token that is present but unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFailurePolicy {
    /// Forward the request without a principal.
    #[default]
    Forward,
    /// Answer with the `AuthError` response and skip the handler.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown auth failure policy {0:?} (expected \"forward\" or \"reject\")")]
pub struct ParsePolicyError(pub String);

impl FromStr for AuthFailurePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Ok(AuthFailurePolicy::Forward),
            "reject" => Ok(AuthFailurePolicy::Reject),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = match resolve_context(&state, request.headers(), Utc::now()).await {
        Ok(context) => context,
        Err(err) => {
            tracing::warn!(
                category = err.error_code(),
                reason = %err,
                path = %request.uri().path(),
                "request authentication failed"
            );
            if state.failure_policy == AuthFailurePolicy::Reject {
                return err.into_response();
            }
            SecurityContext::empty()
        }
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

async fn resolve_context(
    state: &AppState,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<SecurityContext, AuthError> {
    let Some(encoded) = transport::token_from_headers(headers) else {
        return Ok(SecurityContext::empty());
    };

    let value = match transport::decode(&encoded) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                category = err.error_code(),
                reason = %err,
                "token transport value unreadable, treating as absent"
            );
            return Ok(SecurityContext::empty());
        }
    };

    if value.trim().is_empty() {
        return Ok(SecurityContext::empty());
    }

    let raw = TokenCodec::strip_prefix(&value)?;
    let claims = state.tokens.verify_at(raw, now)?;
    let principal = state.resolver.resolve_principal(claims.subject()).await?;

    tracing::debug!(subject = %principal.subject, "request authenticated");
    Ok(SecurityContext::authenticated(principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::transport::encode;
    use crate::state::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{AUTHORIZATION, COOKIE},
            Request as HttpRequest, StatusCode,
        },
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    async fn whoami(Extension(context): Extension<SecurityContext>) -> String {
        context
            .principal()
            .map(|principal| principal.subject.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(state, authenticate))
    }

    fn cookie_request(value: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri("/")
            .header(COOKIE, format!("Authorization={value}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: Router, request: HttpRequest<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!(
            "forward".parse::<AuthFailurePolicy>(),
            Ok(AuthFailurePolicy::Forward)
        );
        assert_eq!(
            " Reject ".parse::<AuthFailurePolicy>(),
            Ok(AuthFailurePolicy::Reject)
        );
        assert!("drop".parse::<AuthFailurePolicy>().is_err());
        assert_eq!(AuthFailurePolicy::default(), AuthFailurePolicy::Forward);
    }

    #[tokio::test]
    async fn request_without_token_is_forwarded_anonymous() {
        let state = test_state(AuthFailurePolicy::Reject);
        let request = HttpRequest::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn valid_cookie_authenticates_request() {
        let state = test_state(AuthFailurePolicy::Forward);
        let token = state.tokens.create("Robbie", "USER", Utc::now()).unwrap();
        let (status, body) = send(app(state), cookie_request(&encode(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Robbie");
    }

    #[tokio::test]
    async fn authorization_header_authenticates_request() {
        let state = test_state(AuthFailurePolicy::Forward);
        let token = state.tokens.create("Robbie", "USER", Utc::now()).unwrap();
        let request = HttpRequest::builder()
            .uri("/")
            .header(AUTHORIZATION, token)
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(app(state), request).await;
        assert_eq!(body, "Robbie");
    }

    #[tokio::test]
    async fn garbage_token_is_forwarded_under_forward_policy() {
        let state = test_state(AuthFailurePolicy::Forward);
        let (status, body) = send(app(state), cookie_request("Bearer%20garbage")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_under_reject_policy() {
        let state = test_state(AuthFailurePolicy::Reject);
        let (status, body) = send(app(state), cookie_request("Bearer%20garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error_code"], "malformed_token");
    }

    #[tokio::test]
    async fn missing_prefix_follows_policy() {
        let state = test_state(AuthFailurePolicy::Forward);
        let token = state.tokens.create("Robbie", "USER", Utc::now()).unwrap();
        let unprefixed = TokenCodec::strip_prefix(&token).unwrap().to_string();

        let (status, body) = send(app(state.clone()), cookie_request(&unprefixed)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let state = AppState {
            failure_policy: AuthFailurePolicy::Reject,
            ..state
        };
        let (status, body) = send(app(state), cookie_request(&unprefixed)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error_code"], "missing_token");
    }

    #[tokio::test]
    async fn malformed_escape_is_treated_as_absent_even_when_rejecting() {
        let state = test_state(AuthFailurePolicy::Reject);
        let (status, body) = send(app(state), cookie_request("Bearer%2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn expired_token_is_forwarded_anonymous() {
        let state = test_state(AuthFailurePolicy::Forward);
        let issued = Utc::now() - chrono::Duration::seconds(2 * 3600);
        let token = state.tokens.create("Robbie", "USER", issued).unwrap();
        let (_, body) = send(app(state), cookie_request(&encode(&token))).await;
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn unknown_subject_follows_policy() {
        let state = test_state(AuthFailurePolicy::Forward);
        let token = state.tokens.create("ghost", "USER", Utc::now()).unwrap();

        let (status, body) = send(app(state.clone()), cookie_request(&encode(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let state = AppState {
            failure_policy: AuthFailurePolicy::Reject,
            ..state
        };
        let (status, _) = send(app(state), cookie_request(&encode(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn contexts_do_not_leak_between_requests() {
        let state = test_state(AuthFailurePolicy::Forward);
        let token = state.tokens.create("Robbie", "USER", Utc::now()).unwrap();
        let app = app(state);

        let (_, first) = send(app.clone(), cookie_request(&encode(&token))).await;
        let anonymous = HttpRequest::builder().uri("/").body(Body::empty()).unwrap();
        let (_, second) = send(app, anonymous).await;

        assert_eq!(first, "Robbie");
        assert_eq!(second, "anonymous");
    }
}
