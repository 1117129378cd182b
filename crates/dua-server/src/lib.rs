//! Read-only HTTP query service for the dua corpus.
//!
//! # Endpoints
//!
//! | Path | Response |
//! |---|---|
//! | `GET /` | service status and endpoint list |
//! | `GET /categories` | `Category[]` |
//! | `GET /categories/{catId}/subcategories` | `Subcategory[]` |
//! | `GET /subcategories/{subcatId}/duas[?fields=a,b]` | `Dua[]` or projected rows |
//! | `GET /search?q=term` (alias `/duas/search`) | `PartialDua[]`, at most 20 |
//!
//! Errors are JSON `{"error": "..."}` bodies: 400 for a blank search term or
//! a field selector naming no known field, 404 for unknown routes and
//! non-numeric ids, 500 when the store fails.
//!
//! The service holds no per-request state; the store is shared behind an
//! `Arc` and queried on the blocking pool.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use dua_store::{ContentStore, StoreError};

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::{ApiIndex, ENDPOINTS};
pub use state::AppState;

use routes::{
    categories_handler, duas_handler, fallback_handler, index_handler, search_handler,
    subcategories_handler,
};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to bind {address}")]
    Bind {
        address: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error")]
    Io(#[from] std::io::Error),
}

/// Build the application router over a shared store.
pub fn router(store: Arc<ContentStore>, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    Router::new()
        .route("/", get(index_handler))
        .route("/categories", get(categories_handler))
        .route(
            "/categories/{cat_id}/subcategories",
            get(subcategories_handler),
        )
        .route("/subcategories/{subcat_id}/duas", get(duas_handler))
        .route("/search", get(search_handler))
        .route("/duas/search", get(search_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState::new(store))
}

/// Open the configured database and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<(), ServeError> {
    info!(database = %config.database.display(), "Opening content store...");
    let store = Arc::new(ContentStore::open(&config.database)?);

    info!("Binding to {}", config.bind);
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServeError::Bind {
            address: config.bind,
            source,
        })?;

    serve(listener, store, &config, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<ContentStore>,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(store, config);
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
