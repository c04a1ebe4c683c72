use std::sync::Arc;

use anyhow::Context;

use cpfauth_api::{app::build_app, AuthHandler};
use cpfauth_auth::TokenIssuer;
use cpfauth_infra::{CachedUserStore, Config, PostgresConnector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cpfauth_observability::init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(
        database = %config.database.connection_url(),
        "configuration loaded"
    );

    let store = Arc::new(CachedUserStore::new(PostgresConnector::new(&config.database)));
    let issuer = TokenIssuer::new(config.auth.jwt_secret.into_bytes());
    let handler = Arc::new(AuthHandler::new(store, issuer));

    let app = build_app(handler);

    let listener = tokio::net::TcpListener::bind(config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
