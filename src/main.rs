// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode};

use telegram_miniapp_server::{
    api::router,
    auth::LaunchDataVerifier,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    server,
    state::AppState,
    store::InMemoryStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    // A verifier that cannot be built is fatal: never serve without one.
    let verifier =
        match LaunchDataVerifier::with_max_age(&config.bot_token, config.max_auth_age_secs) {
            Ok(verifier) => verifier,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialise launch data verifier");
                return ExitCode::FAILURE;
            }
        };

    let state = AppState::new(InMemoryStore::new(), verifier);
    let app = router(state);

    let addr: SocketAddr = match config.bind_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, address = %config.bind_address(), "Failed to parse bind address");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        max_auth_age_secs = config.max_auth_age_secs,
        tls = config.tls.is_some(),
        "Starting Telegram Mini App server"
    );

    if let Err(e) = server::serve(app, addr, config.tls.as_ref()).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
