use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chess_review_core::EnginePool;

mod config;
mod error;
mod routes;

use config::ServerConfig;

pub struct AppState {
    pub pool: EnginePool,
    /// Search depth when a request does not name one
    pub depth: u8,
    /// Bound on a whole game review, on top of the per-search timeout
    pub deadline: Option<Duration>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            pool: EnginePool::new(config.engine.clone()),
            depth: config.engine.depth,
            deadline: config.deadline,
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze-game", post(routes::review::analyze_game))
        .route("/api/analyze-game", post(routes::review::analyze_game))
        .route("/evaluate-position", post(routes::review::evaluate_position))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_review_web=info,chess_review_core=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        engine = %config.engine.path,
        depth = config.engine.depth,
        pool_size = config.engine.pool_size,
        "Engine pool configured"
    );

    let state = Arc::new(AppState::new(&config));
    let app = app(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("Server running at http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    state.pool.close();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down");
    }
}
