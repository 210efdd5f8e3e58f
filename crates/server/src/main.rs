use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use advisor::GeminiClient;
use common::config::AppConfig;
use common::logger;
use storage::Warehouse;

use crate::state::AppState;

mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = AppConfig::from_env()?;

    let warehouse = Arc::new(
        Warehouse::connect(
            &config.warehouse_url,
            &config.feature_table,
            config.query_timeout,
        )
        .await?,
    );
    info!("Serving features from table '{}'", warehouse.table());

    let model = Arc::new(GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_model,
        &config.gemini_api_key,
        config.model_timeout,
    )?);
    debug!("Using model: {}", config.gemini_model);

    let state = AppState::new(warehouse.clone(), warehouse, model);
    let app = routes::create_router(state, &config.cors_origin)?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}/api", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, finishing in-flight requests..."),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
