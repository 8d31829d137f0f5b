//! gram Development Server
//!
//! Serves the interaction bundle and its assets, renders a demo page, and
//! answers the subscribe and like/dislike endpoints from memory.

mod config;
mod handlers;
mod page;
mod state;
mod store;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::handlers::{health_check, index, like_dislike, subscribe};
use crate::state::AppState;
use crate::store::MemoryStore;

fn build_router(state: AppState, static_dir: &Path) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))

        // Pages
        .route("/", get(|| async { Redirect::permanent("/main_app/") }))
        .route("/main_app/", get(index))

        // Interactions
        .route("/main_app/{pk}/like-dislike/", post(like_dislike))
        .route("/main_app/profile/{pk}/subscribe/", post(subscribe))

        // Bundle, styles and images
        .nest_service("/static", ServeDir::new(static_dir))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    if !config.static_dir.join("pkg").is_dir() {
        tracing::warn!("⚠ No bundle in {}/pkg", config.static_dir.display());
        tracing::warn!("  Build it with: wasm-pack build crates/gram-web --target web --out-dir ../../static/pkg");
    }

    let state = AppState {
        store: Arc::new(MemoryStore::seeded(config.seed_posts)),
        user_id: config.user_id,
        csrf_token: Arc::from(config.csrf_token.as_str()),
    };

    let app = build_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 gram dev server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Acting as user {} with {} seeded posts", config.user_id, config.seed_posts);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                           - Health check");
    tracing::info!("  GET  /main_app/                        - Demo page");
    tracing::info!("  POST /main_app/{{pk}}/like-dislike/      - Like or dislike a post");
    tracing::info!("  POST /main_app/profile/{{pk}}/subscribe/ - Toggle subscription");
    tracing::info!("  GET  /static/*                         - Bundle and assets");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
