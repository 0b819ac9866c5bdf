use std::sync::Arc;

use anyhow::Context;

use centra_api::authz::AccessGate;
use centra_api::db::PgStore;
use centra_api::{app, config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Centra API in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::connect_pool(&database_url, &config.database)
        .await
        .context("failed to connect to database")?;

    let store = Arc::new(PgStore::new(pool));
    let state = AppState {
        gate: AccessGate::new(store.clone()),
        directory: store,
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("CENTRA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Centra API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
