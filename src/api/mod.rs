//! REST API for on-demand sizing runs.
//!
//! Provides two endpoints:
//! - `POST /sizing`: validate and simulate a configuration, optionally
//!   against a caller-supplied profile
//! - `GET /profile/template`: the server's profile as editable CSV

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, post};

use crate::profile::HourlyProfile;
use crate::sim::cache::SizingCache;

pub use types::{ErrorResponse, SizingRequest};

/// Application state shared across all request handlers.
///
/// The profile is read-only; the cache is the only mutable part.
pub struct AppState {
    /// Profile used when a request does not bring its own.
    pub profile: HourlyProfile,
    /// Memoized results across requests.
    pub cache: Mutex<SizingCache>,
}

impl AppState {
    /// Wraps a default profile with an empty cache.
    pub fn new(profile: HourlyProfile) -> Self {
        Self {
            profile,
            cache: Mutex::new(SizingCache::new()),
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sizing", post(handlers::post_sizing))
        .route("/profile/template", get(handlers::get_template))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
