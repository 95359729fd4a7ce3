mod config;

use std::sync::Arc;

use anyhow::Context;

use tracing::{info, warn};

use murmur_api::{AppState, AppStateInner, routes};
use murmur_gateway::Dispatcher;
use murmur_store::{AccountStore, MessageLog};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_placeholder_secret() {
        warn!("MURMUR_JWT_SECRET is unset; using the development placeholder secret");
    }

    // Shared state, process lifetime
    let log = Arc::new(MessageLog::new());
    let state: AppState = Arc::new(AppStateInner {
        accounts: AccountStore::new(),
        tokens: config.token_issuer(),
        dispatcher: Dispatcher::new(log),
    });

    let app = routes::with_tracing(routes::router(state).layer(config.cors()?));

    let listener = tokio::net::TcpListener::bind(config.listen_target())
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Murmur server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
