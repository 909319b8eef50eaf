//! EMS Server — application entry point.

use std::error::Error;

use ems_db::repository::SurrealSessionRepository;
use ems_server::config::ServerConfig;
use ems_server::reaper::SessionReaper;
use ems_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ems=info".parse()?))
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    let db = ems_db::connect(&config.db).await?;
    ems_db::run_migrations(&db).await?;

    let state = AppState::new(db.clone(), config.auth.clone());

    let reaper = SessionReaper::new(SurrealSessionRepository::new(db))
        .with_interval(config.reaper_interval)
        .spawn();

    let app = ems_server::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "EMS server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reaper.shutdown().await;
    tracing::info!("EMS server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
