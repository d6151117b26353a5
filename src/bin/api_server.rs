// src/bin/api_server.rs

use product_catalog::infra::{config::Settings, logging};
use product_catalog::transport;
use product_catalog::{storage, ProductRepository};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::setup_tracing();

    let settings = Settings::from_env()?;

    // --- Record Store Initialization ---
    info!(backend = ?settings.store.backend, "> Connecting to record store...");
    let store = match storage::connect(&settings.store).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "> Could not connect to the record store");
            return Err(e.into());
        }
    };

    // --- Repository Initialization ---
    let repository = ProductRepository::new(store);
    if settings.seed_sample_data {
        let seeded = repository.load_sample_data().await?;
        info!("> Seeded {} sample products.", seeded.len());
    }

    let app_state = transport::http::AppState { repository };

    // --- API Server Initialization ---
    let app = transport::http::create_app(app_state);
    let addr = format!("0.0.0.0:{}", settings.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("> API server listening on http://{}", addr);
    info!(
        "> Swagger UI available at http://localhost:{}/swagger-ui",
        settings.http_port
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("> Shutdown signal received (Ctrl+C).");
        }
    }

    Ok(())
}
