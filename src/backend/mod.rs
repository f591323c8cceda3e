mod error;
mod handlers;
mod routes;

pub use error::AppError;

use axum::{routing::get, Router};
use sqlx::{Pool, Sqlite};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis::model::ModelStore;
use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub models: ModelStore,
    pub settings: Arc<Settings>,
}

pub fn app(state: AppState) -> Router {
    // The dashboard is served from a different origin during development, so
    // the API stays wide open like the original deployment.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Welcome to the Pennywise API" }))
        .merge(routes::api_routes())
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(pool: Pool<Sqlite>, settings: Settings) -> anyhow::Result<()> {
    let port = settings.port;
    let state = AppState {
        db: pool,
        models: ModelStore::new(settings.model_path.clone()),
        settings: Arc::new(settings),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
