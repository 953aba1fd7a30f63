//! # Omega Node
//!
//! HTTP server turning briefs into decks and decks into `.pptx` files.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod api;
mod config;
mod orchestrator;
mod state;

use config::NodeConfig;
use state::AppState;

/// Run the Omega node server.
pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Omega node starting...");

    let addr = config.addr;
    let state = AppState::new(config);
    info!(
        "Provider {} (models: {}), body limit {} bytes",
        if state.config.api_key.is_some() { "configured" } else { "disabled" },
        state.config.provider.fallback_models.join(", "),
        state.config.max_body_bytes
    );
    let app = create_router(state);

    info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router.
fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/api/generate", post(api::generate::generate_deck))
        .route("/api/export", post(api::export::export_deck))
        .route(
            "/api/session",
            get(api::session::get_session).delete(api::session::clear_session),
        )
        .route("/api/session/export", get(api::export::session_export_payload))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(body_limit),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    run_server(NodeConfig::from_env()).await
}
