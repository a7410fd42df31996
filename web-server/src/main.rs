//! Churn Web Server
//!
//! HTTP presentation layer over the churn inference core.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CHURN WEB                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │  API      │  │  Session Store   │  │  Blocking Pool   │ │
//! │  │  (Axum)   │  │  (per-id locks)  │  │  predict/explain │ │
//! │  └─────┬─────┘  └────────┬─────────┘  └────────┬─────────┘ │
//! │        └─────────────────┼─────────────────────┘           │
//! │                          ▼                                  │
//! │               ┌─────────────────────┐                       │
//! │               │  InferenceContext   │  (read-only, Arc)     │
//! │               └─────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, delete},
};
use churn_core::logic::session::SessionStore;
use churn_core::InferenceContext;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging (JSON lines in production)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "churn_web=debug,churn_core=info,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Churn Web Server starting ({})...", config.environment);
    tracing::info!("Model: {}", config.service.model_path.display());

    // The model is loaded once; a missing or corrupt artifact is fatal
    let ctx = InferenceContext::load(config.service.clone())?;

    let state = AppState::new(ctx, config.clone());
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<InferenceContext>,
    pub sessions: Arc<SessionStore>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(ctx: InferenceContext, config: config::Config) -> Self {
        Self {
            sessions: Arc::new(SessionStore::from_config(&config.service)),
            ctx: Arc::new(ctx),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/form", get(handlers::form::get_form))
        .route("/api/v1/model", get(handlers::form::get_model))
        .route("/api/v1/predict", post(handlers::predict::predict))

        // Sessions
        .route("/api/v1/sessions", post(handlers::sessions::create))
        .route("/api/v1/sessions/:id/predict", post(handlers::sessions::predict))
        .route("/api/v1/sessions/:id/history", get(handlers::sessions::history))
        .route("/api/v1/sessions/:id", delete(handlers::sessions::delete))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
