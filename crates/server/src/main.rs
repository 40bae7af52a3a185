use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod routes;
mod storage;

use config::ServerConfig;
use storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
}

/// Local-mode API router over the given storage
pub fn app(storage: Storage) -> Router {
    let state = AppState {
        storage: Arc::new(storage),
    };

    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/systems",
            get(routes::list_systems).post(routes::save_system),
        )
        .route(
            "/api/systems/{filename}",
            get(routes::get_system).delete(routes::delete_system),
        )
        .route("/api/sprites", get(routes::list_sprites))
        .route("/api/sprites/{filename}", get(routes::get_sprite))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        "Systems in {}, sprites in {}",
        config.systems_dir.display(),
        config.sprite_dir.display()
    );

    let app = app(Storage::new(&config.systems_dir, &config.sprite_dir));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Cannot bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{}", config.bind_addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
