use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use flightfeed_store::StoreError;

/// Errors surfaced by the query endpoint.
///
/// A store failure produces an error response rather than an empty catalog,
/// so callers can tell "no flights" apart from "cache unreachable".
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Store(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::error!(%status, error = %self, "query request failed");
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
