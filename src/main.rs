//! Himawari Nursery Backend
//!
//! REST backend for the nursery's public website and admin panel. Content is
//! stored as JSON files in a GitHub repository; every write becomes a commit.

mod api;
mod assets;
mod auth;
mod config;
mod errors;
mod models;
mod repo;
mod store;
mod validation;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use repo::ContentRepository;
use store::GitHubContentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<ContentRepository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Himawari Nursery Backend");
    tracing::info!(
        "Content repository: {}/{} (branch: {})",
        config.github_owner,
        config.github_repo,
        config.github_branch
    );
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn about missing credentials
    if config.github_token.is_none() {
        tracing::warn!("No GitHub token configured (GITHUB_TOKEN). Content writes will fail!");
    }
    if config.admin_pass_hash.is_none() || config.session_secret.is_none() {
        tracing::warn!(
            "ADMIN_PASS_HASH or SESSION_SECRET not configured. Admin login is disabled!"
        );
    }

    // Initialize the content store and repository
    let store = Arc::new(GitHubContentStore::new(&config)?);
    let repo = Arc::new(ContentRepository::new(store));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes. Reads are public; mutating handlers check the session
    // and CSRF token themselves.
    let api_routes = Router::new()
        // Session
        .route("/login", post(api::login))
        .route("/logout", post(api::logout))
        // News
        .route("/news", get(api::list_news))
        .route("/news", post(api::create_news))
        .route("/news", put(api::update_news))
        .route("/news", delete(api::delete_news))
        // Staff
        .route("/staff", get(api::list_staff))
        .route("/staff", post(api::create_staff))
        .route("/staff", put(api::update_staff))
        .route("/staff", delete(api::delete_staff))
        // Documents
        .route("/documents", get(api::list_documents))
        .route("/documents", post(api::create_document))
        .route("/documents", put(api::update_document))
        .route("/documents", delete(api::delete_document))
        // Settings
        .route("/settings", get(api::get_settings))
        .route("/settings", put(api::update_settings))
        // Photo uploads are the largest accepted bodies; leave headroom over
        // the app-level cap so oversized files get a validation error rather
        // than a transport rejection
        .layer(DefaultBodyLimit::max(assets::MAX_PHOTO_BYTES + 1024 * 1024));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
