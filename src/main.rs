use std::sync::Arc;

use taskbridge_api::config::AppConfig;
use taskbridge_api::state::AppState;
use taskbridge_api::store::RestStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up the store credentials.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let store = Arc::new(RestStore::new(&config)?);

    let state = AppState {
        config,
        keys: store.clone(),
        tasks: store,
    };

    let app = taskbridge_api::app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("TASKAPI_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Taskbridge API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
