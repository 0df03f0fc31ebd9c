use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, state::AppState};
use service::{
    ledger::{LedgerService, Record},
    steam::SteamClient,
    storage::JsonMapStore,
};

fn build_cors() -> CorsLayer {
    // the admin page is served from another origin
    CorsLayer::very_permissive()
}

/// Bind the configured host and port. The host may be an IP literal or a name such as `localhost`.
pub async fn bind_listener(cfg: &AppConfig) -> anyhow::Result<tokio::net::TcpListener> {
    let host = cfg.server.host.as_str();
    let port = cfg.server.port;
    tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind {host}:{port}: {e}"))
}

/// Wire the record file, the Steam client and the router from configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store_path = std::path::Path::new(&cfg.store.path);
    let store = JsonMapStore::<String, Record>::open(store_path).await?;
    let steam = Arc::new(SteamClient::from_config(&cfg.steam));
    info!(store = %store.path().display(), steam_base_url = %cfg.steam.base_url, "ledger wired");

    let ledger = LedgerService::new(store, steam);
    Ok(routes::build_router(AppState::new(ledger), build_cors()))
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    let listener = bind_listener(&cfg).await?;
    info!(addr = %listener.local_addr()?, "ledger server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
