pub mod api;
pub mod app_state;
pub mod core;
pub mod domain;
pub mod errors;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app_state::build_app_state;
use crate::core::client::cancel::CancelSignal;
use crate::core::client::monitor_client::HttpRequestSender;
use crate::core::config::AppConfig;

/// Serves the query API until SIGINT/SIGTERM. In-flight query runs are
/// cancelled as soon as the signal arrives.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let sender = HttpRequestSender::new(&config.api_url, config.access_token.clone(), config.request_timeout)?;
    let (shutdown_tx, shutdown) = CancelSignal::channel();

    let state = build_app_state(Arc::new(sender), config.default_subscription.clone(), shutdown);
    let app = routes::app_router().with_state(state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("azmon query service listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .context("server error")?;

    info!("azmon query service stopped");
    Ok(())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => info!("SIGINT received"),
                    _ = sigterm.recv() => info!("SIGTERM received"),
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => warn!("signal handler registration failed, using ctrl_c: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("ctrl_c handler failed: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received");
}
