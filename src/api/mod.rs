// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{auth::authenticate, error::route_not_found, state::AppState};

pub mod health;
pub mod tokens;
pub mod users;

pub fn router(state: AppState) -> Router {
    let gated_routes = Router::new()
        .route("/get-jwt", get(tokens::get_jwt))
        .route("/user/me", get(users::get_current_user))
        .route("/admin/ping", get(users::admin_ping))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Issuance stays outside the gate so a stale cookie can always be replaced.
    let api_routes = Router::new()
        .route("/create-jwt", get(tokens::create_jwt))
        .merge(gated_routes)
        .with_state(state);

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
