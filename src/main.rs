// src/main.rs
use account_validation_api::common::config::{apply_cli_override, log_config_status};
use account_validation_api::common::{AppConfig, AppState};
use dotenv::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    let config = apply_cli_override(AppConfig::from_env()?);
    log_config_status(&config);

    // ========================================================================
    // APPLICATION STATE AND ROUTER
    // ========================================================================

    let port = config.port;
    let state = AppState::new(config)?;
    info!("Account rules initialized");

    let app = account_validation_api::app(state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
