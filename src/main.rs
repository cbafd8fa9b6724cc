// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use token_gate::{
    api::{router, tokens::DEMO_SUBJECT},
    auth::{InMemoryPrincipalResolver, Role, SigningKey, TokenCodec},
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Token gate stopped");
        process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // The key is decoded before binding so a bad secret never serves a request.
    let key = SigningKey::from_base64(&config.jwt_secret)?;
    tracing::info!(key_len = key.len(), "Signing key initialized");

    let mut resolver = InMemoryPrincipalResolver::new().with_principal(DEMO_SUBJECT, Role::User);
    if let Some(admin) = &config.seed_admin {
        resolver = resolver.with_principal(admin.clone(), Role::Admin);
        tracing::info!(subject = %admin, "Seeded admin principal");
    }

    let state =
        AppState::new(TokenCodec::new(key), resolver).with_failure_policy(config.failure_policy);
    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        failure_policy = ?config.failure_policy,
        "Token gate listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Token gate shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
