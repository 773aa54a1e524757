//! HTTP surface.
//!
//! Thin axum handlers over [`AnimeService`] and [`AiringListOrchestrator`].

pub mod error;
pub mod handlers;

pub use error::AppError;

use crate::orchestrator::AiringListOrchestrator;
use crate::service::AnimeService;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AiringListOrchestrator>,
    pub service: Arc<AnimeService>,
}

impl AppState {
    pub fn new(orchestrator: Arc<AiringListOrchestrator>, service: Arc<AnimeService>) -> Self {
        Self {
            orchestrator,
            service,
        }
    }
}

/// CORS for the configured origins, credentials allowed
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    // Static segments are matched before the `:id` capture
    Router::new()
        .route("/health", get(handlers::health))
        .route("/anime/search", get(handlers::search))
        .route("/anime/trending", get(handlers::trending))
        .route("/anime/top-airing", get(handlers::top_airing))
        .route("/anime/:id", get(handlers::get_anime))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
