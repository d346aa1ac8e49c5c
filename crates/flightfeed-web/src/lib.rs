//! # Flightfeed Web
//!
//! Read-only HTTP surface over the flight catalog: one operation returning
//! the full current catalog as a JSON array, plus a liveness probe. No
//! filtering, no pagination, no staleness signal beyond "whatever has not
//! yet expired".

pub mod error;

use std::net::SocketAddr;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use flightfeed_core::{Flight, FlightCatalog};

pub use crate::error::ApiError;

#[derive(Clone)]
struct AppState {
    catalog: FlightCatalog,
}

/// Build the query router over a catalog.
pub fn app(catalog: FlightCatalog) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    Router::new()
        .route("/", get(get_all_flights))
        .route("/health", get(health))
        .layer(cors)
        .with_state(AppState { catalog })
}

/// Bind `addr` and serve the query router until the task is cancelled.
pub async fn serve(addr: SocketAddr, catalog: FlightCatalog) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "query endpoint listening");
    axum::serve(listener, app(catalog)).await
}

async fn get_all_flights(
    State(state): State<AppState>,
) -> Result<Json<Vec<Flight>>, ApiError> {
    let flights = state.catalog.list_all().await?;
    Ok(Json(flights))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
