//! Enhanced preprints server
//!
//! JSON routes over the article repository.

pub mod config;
pub mod http;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use epp_core::{ArticleRepository, InMemoryArticleStore};

pub use config::ServerConfig;

/// Shared application state
pub struct AppState {
    pub repository: Arc<dyn ArticleRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryArticleStore::new()))
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/preprints",
            post(http::post_preprint).get(http::list_preprints),
        )
        .route("/api/preprint-summaries", get(http::list_summaries))
        .route(
            "/api/preprints/{identifier}",
            get(http::get_preprint).delete(http::delete_preprint),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Enhanced preprints server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
