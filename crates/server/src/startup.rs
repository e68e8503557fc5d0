use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{
    file::record_service::RecordService,
    storage::{document::Collection, document_store::DocumentStore},
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

/// Cross-origin browser clients are the primary consumers; allow everything.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(5000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Resolve the data file path from configs or the DATA_FILE env var.
fn load_data_file() -> String {
    match configs::load_default() {
        Ok(cfg) => {
            let mut storage = cfg.storage;
            storage.normalize_from_env();
            storage.data_file
        }
        Err(_) => env::var("DATA_FILE").unwrap_or_else(|_| "data/data.json".to_string()),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let data_file = load_data_file();
    common::env::ensure_data_dir(&data_file).await?;

    // Single document store shared by both collections
    let store = DocumentStore::new(&data_file).await?;
    let state = ServerState {
        scenarios: RecordService::new(Arc::clone(&store), Collection::Scenarios),
        vehicles: RecordService::new(Arc::clone(&store), Collection::Vehicles),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, data_file = %data_file, "starting server crate");
    println!("Server running on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
