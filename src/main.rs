// src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use http::HeaderValue;
use poll_backend::config::{Config, StoreBackend};
use poll_backend::{db, routes, telemetry, AppState, EntityStore, MemoryStore, PgStore};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load environment variables from .env file
    telemetry::init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let store: Arc<dyn EntityStore> = match config.backend {
        StoreBackend::Postgres => {
            let database_url = config.database_url.as_deref().unwrap_or_default();
            let pool = db::create_pool(database_url, config.max_connections).await?;
            if config.run_migrations {
                db::run_migrations(&pool).await?;
            }
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let origin = config
        .cors_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;

    let app = routes::app(AppState::new(store), origin.as_ref());

    let addr = config.bind_addr()?;
    info!(%addr, "server listening");

    // Connect info feeds the voter fallback identifier.
    axum_server::bind(addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
