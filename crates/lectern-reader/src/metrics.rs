//! Prometheus metrics helpers.
//!
//! Centralized recorder initialization and metric descriptions for the
//! reader pipeline. Counters and gauges are recorded with the `metrics`
//! macros at the call sites; without an installed recorder they are no-ops,
//! so library code records unconditionally.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
///
/// # Panics
///
/// Panics if called more than once (the recorder can only be installed
/// once).
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_common_metrics();

    handle
}

/// Like [`init_metrics`] but returns `None` if a recorder is already
/// installed. Useful for tests.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    PrometheusBuilder::new().install_recorder().ok()
}

/// Start the Prometheus metrics HTTP server.
///
/// Serves `/metrics` on the given port; spawns a background task and
/// returns immediately.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Metrics server failed: {}", e);
        }
    });

    Ok(())
}

/// Register descriptions for the reader's metrics.
fn register_common_metrics() {
    describe_counter!("relay_connects_total", "Successful relay connect attempts");
    describe_counter!(
        "relay_connect_failures_total",
        "Failed or timed-out relay connect attempts"
    );
    describe_counter!(
        "relay_query_events_total",
        "Events returned by per-relay queries"
    );
    describe_counter!(
        "relay_query_failures_total",
        "Per-relay queries that failed or timed out"
    );
    describe_counter!("fetch_cycles_total", "Completed fetch cycles");
    describe_gauge!("relay_connections", "Number of currently connected relays");
}
