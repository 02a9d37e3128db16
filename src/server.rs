// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP(S) serving with graceful shutdown on Ctrl-C / SIGTERM.

use std::{future::Future, net::SocketAddr, time::Duration};

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};

use crate::config::TlsPaths;

/// How long in-flight TLS connections get to finish after a shutdown signal.
pub const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serve `app` on `addr`, over HTTPS when `tls` is set.
pub async fn serve(app: Router, addr: SocketAddr, tls: Option<&TlsPaths>) -> std::io::Result<()> {
    match tls {
        Some(tls) => serve_tls(app, addr, tls).await,
        None => serve_plain(app, addr).await,
    }
}

async fn serve_plain(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn serve_tls(app: Router, addr: SocketAddr, tls: &TlsPaths) -> std::io::Result<()> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
    tracing::info!(cert = %tls.cert.display(), "Loaded TLS certificate");

    let handle = Handle::<SocketAddr>::new();
    tokio::spawn(shutdown_on(handle.clone(), shutdown_signal()));

    tracing::info!("Listening on https://{addr} (docs at /docs)");
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
}

/// Start a graceful shutdown of the server behind `handle` once `signal` fires.
async fn shutdown_on(handle: Handle<SocketAddr>, signal: impl Future<Output = ()>) {
    signal.await;
    handle.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::router, state::AppState};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn handle_stops_server_when_signal_fires() {
        let handle = Handle::<SocketAddr>::new();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = tokio::spawn(
            axum_server::bind(addr)
                .handle(handle.clone())
                .serve(router(AppState::for_tests()).into_make_service()),
        );

        let (stop, stopped) = oneshot::channel::<()>();
        let shutdown = tokio::spawn(shutdown_on(handle.clone(), async {
            let _ = stopped.await;
        }));

        let bound = handle.listening().await.expect("server is listening");
        assert_ne!(bound.port(), 0);

        stop.send(()).unwrap();
        shutdown.await.unwrap();
        server
            .await
            .unwrap()
            .expect("server exits cleanly after graceful shutdown");
    }
}
