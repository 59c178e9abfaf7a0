//! # Prometheus Metrics
//!
//! Operational metrics for the signing service, scraped at `/metrics`.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] under
//! the `stellar_signer` prefix so they do not collide with any default
//! global registry consumers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

use stellar_signer::{BatchError, ItemOutput};

/// Holds all Prometheus metric handles for the service.
///
/// Clone-friendly (prometheus handles are `Arc`s internally) so it can be
/// shared across request handlers.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Items that came back with a signature.
    pub items_signed_total: IntCounter,
    /// Items that failed, in either failure mode.
    pub items_failed_total: IntCounter,
    /// Batches received, whatever their outcome.
    pub batches_total: IntCounter,
    /// Wall time to process one batch.
    pub signing_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("stellar_signer".into()), None)?;

        let items_signed_total =
            IntCounter::new("items_signed_total", "Total number of items signed")?;
        registry.register(Box::new(items_signed_total.clone()))?;

        let items_failed_total = IntCounter::new(
            "items_failed_total",
            "Total number of items that failed to sign",
        )?;
        registry.register(Box::new(items_failed_total.clone()))?;

        let batches_total = IntCounter::new("batches_total", "Total number of batches processed")?;
        registry.register(Box::new(batches_total.clone()))?;

        let signing_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signing_latency_seconds",
                "Batch signing latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ]),
        )?;
        registry.register(Box::new(signing_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            items_signed_total,
            items_failed_total,
            batches_total,
            signing_latency_seconds,
        })
    }

    /// Count one batch outcome. A strict-mode abort counts as one failed
    /// item; items after it were never attempted.
    pub fn record_batch(&self, result: &Result<Vec<ItemOutput>, BatchError>) {
        self.batches_total.inc();
        match result {
            Ok(outputs) => {
                let signed = outputs.iter().filter(|o| o.is_success()).count() as u64;
                self.items_signed_total.inc_by(signed);
                self.items_failed_total.inc_by(outputs.len() as u64 - signed);
            }
            Err(BatchError::Item { .. }) | Err(BatchError::InvalidItem { .. }) => {
                self.items_failed_total.inc();
            }
            Err(BatchError::MissingCredentials) => {}
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics handle.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails.
pub fn render(metrics: &NodeMetrics) -> Response {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
