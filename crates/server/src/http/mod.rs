//! HTTP surface of the documentation server.
//!
//! ## Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/docs` | document list, optional `?q=` filter |
//! | `GET /api/docs/{filename}` | one rendered document |
//! | `GET /` | `index.html` from the public directory |
//! | anything else | static file from the public directory |
//!
//! Requests are independent. The only shared state is the immutable
//! [`AppState`].

pub mod error;
pub mod handlers;

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{Config, DocsConfig};
use crate::docs::DocumentStore;

pub use error::ApiError;

/// State shared by all handlers.
pub struct AppState {
    /// Document store over the docs directory.
    pub store: DocumentStore,
    /// Absolute path of the static asset directory.
    pub public_dir: PathBuf,
}

/// Shared handle to [`AppState`].
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the state from the docs section of the configuration.
    pub fn from_config(config: &DocsConfig) -> io::Result<Self> {
        Ok(Self {
            store: DocumentStore::new(&config.docs_dir)?,
            public_dir: std::path::absolute(&config.public_dir)?,
        })
    }
}

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    let index = ServeFile::new(state.public_dir.join("index.html"));
    let assets = ServeDir::new(&state.public_dir);

    Router::new()
        .route("/api/docs", get(handlers::list_docs))
        .route("/api/docs/{filename}", get(handlers::get_doc))
        .route_service("/", index)
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are drained before returning.
pub async fn serve_on<F>(listener: TcpListener, state: SharedState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn run<F>(config: &Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(
        AppState::from_config(&config.docs).context("Failed to resolve configured directories")?,
    );

    if !state.store.docs_dir().is_dir() {
        tracing::warn!(
            "Docs directory {:?} does not exist; listing will fail until it is created",
            state.store.docs_dir()
        );
    }
    if !state.public_dir.join("index.html").is_file() {
        tracing::warn!("No index.html in public directory {:?}", state.public_dir);
    }

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let addr = listener.local_addr()?;

    tracing::info!("mdocs documentation server running at http://{}", addr);
    tracing::info!("Serving documents from {:?}", state.store.docs_dir());
    tracing::info!("Press Ctrl+C to stop the server");

    serve_on(listener, state, shutdown).await
}
