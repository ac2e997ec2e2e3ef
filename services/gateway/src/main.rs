//! WebJive authentication gateway — main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use webjive_auth::config::Config;
use webjive_auth::http::{AppState, router};
use webjive_auth::shutdown::shutdown_signal;
use webjive_auth::strategies::VerifierChain;
use webjive_auth::token::TokenService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting WebJive auth gateway");

    let config = Config::from_env().context("Failed to load configuration")?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid listen address")?;

    let verifiers = Arc::new(VerifierChain::from_config(&config)?);
    info!(strategies = ?verifiers.names(), "verification strategies registered");

    let tokens = Arc::new(TokenService::new(&config.signing_secret, config.token_ttl));

    let app = router(AppState {
        tokens,
        verifiers,
        cookie_secure: config.cookie_secure,
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Auth gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Auth gateway stopped");

    Ok(())
}
