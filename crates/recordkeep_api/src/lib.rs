//! HTTP surface for the record service.
//!
//! # Responsibility
//! - Expose record listing and mutations as a JSON REST API.
//! - Map service failures onto 400/404/500 without leaking details.
//!
//! # See also
//! - `recordkeep_core` for the listing pipeline and storage contract.

pub mod api;
pub mod error;
pub mod middleware;
pub mod state;

use axum::routing::get;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;

pub use error::ApiError;
pub use state::AppState;

/// Builds the application router over an opened store.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(
            "/records",
            get(api::list_records)
                .post(api::create_record)
                .fallback(api::records_method_not_allowed),
        )
        .route(
            "/records/:id",
            get(api::get_record)
                .put(api::update_record)
                .delete(api::delete_record)
                .fallback(api::record_method_not_allowed),
        )
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
