use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — Prometheus text exposition of the relay's counters.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}

/// Register descriptions for every series the relay records.
pub fn describe() {
    metrics::describe_counter!(
        "face_verification_requests_total",
        "Face verification requests by outcome"
    );
    metrics::describe_histogram!(
        "face_verification_relay_seconds",
        "Time spent waiting on the verification service"
    );
    metrics::describe_counter!(
        "face_verification_upload_bytes_total",
        "Bytes of uploaded images written to disk"
    );
}
