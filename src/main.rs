use std::sync::Arc;

use anyhow::Context;
use helpinghands::{
    AppState, app,
    auth::Clients,
    config::Config,
    store::MongoStore,
};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    info!("Connecting to {}...", config.db_url);
    let store = MongoStore::connect(&config.db_url, &config.db_name)
        .await
        .context("database unreachable")?;

    let clients = Clients::from_config(&config).context("bad identity provider config")?;

    let address = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        store: Arc::new(store),
        clients,
        config: Arc::new(config),
    };

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
