//! # HTTP API
//!
//! Builds the axum router that exposes the signer to workflow engines.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path        | Description                              |
//! |--------|-------------|------------------------------------------|
//! | GET    | `/health`   | Liveness probe plus signer address       |
//! | POST   | `/v1/sign`  | Sign a batch of items                    |
//! | GET    | `/metrics`  | Prometheus metrics                       |
//!
//! The secret is held in the state and never returned by any endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use zeroize::Zeroizing;

use stellar_signer::{
    process_items_with_network, BatchError, ErrorKind, FailureMode, ItemOutput, Network,
};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone: everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The service's reported version string.
    pub version: String,
    /// Public address of the configured key, for `/health`.
    pub public_key: String,
    /// Network for items that don't name one.
    pub default_network: Network,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
    secret: Arc<Zeroizing<String>>,
}

impl AppState {
    pub fn new(
        version: String,
        public_key: String,
        default_network: Network,
        secret: Zeroizing<String>,
        metrics: SharedMetrics,
    ) -> Self {
        Self {
            version,
            public_key,
            default_network,
            metrics,
            secret: Arc::new(secret),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /v1/sign`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub items: Vec<Value>,
    #[serde(default)]
    pub continue_on_fail: bool,
    /// Overrides the server's default network for this batch.
    #[serde(default)]
    pub network: Option<Network>,
}

/// Successful `POST /v1/sign` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignResponse {
    pub items: Vec<ItemOutput>,
}

/// Error body for a rejected batch.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub public_key: String,
    pub default_network: Network,
}

/// Maps a [`BatchError`] to a status code and an [`ErrorResponse`] body.
struct BatchErrorResponse(BatchError);

impl IntoResponse for BatchErrorResponse {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match &err {
            BatchError::Item { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BatchError::InvalidItem { .. } => StatusCode::BAD_REQUEST,
            BatchError::MissingCredentials => StatusCode::SERVICE_UNAVAILABLE,
        };
        let kind = match &err {
            BatchError::Item { source, .. } => Some(source.kind()),
            _ => None,
        };
        let body = ErrorResponse {
            error: err.to_string(),
            item_index: err.item_index(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all routes and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/sign", post(sign_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 while the process is up.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        version: state.version.clone(),
        public_key: state.public_key.clone(),
        default_network: state.default_network,
    })
}

/// `POST /v1/sign` — sign a batch.
///
/// Signing is CPU-bound and takes well under a millisecond per item, so
/// the batch runs inline on the request task.
async fn sign_handler(
    State(state): State<AppState>,
    Json(req): Json<SignRequest>,
) -> Result<Json<SignResponse>, BatchErrorResponse> {
    let mode = FailureMode::from_continue_on_fail(req.continue_on_fail);
    let network = req.network.unwrap_or(state.default_network);

    let timer = state.metrics.signing_latency_seconds.start_timer();
    let result = process_items_with_network(&req.items, &state.secret, mode, network);
    timer.observe_duration();
    state.metrics.record_batch(&result);

    match result {
        Ok(items) => Ok(Json(SignResponse { items })),
        Err(err) => {
            tracing::warn!(item_index = ?err.item_index(), "batch rejected: {}", err);
            Err(BatchErrorResponse(err))
        }
    }
}

/// `GET /metrics` — Prometheus text exposition.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    crate::metrics::render(&state.metrics)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
