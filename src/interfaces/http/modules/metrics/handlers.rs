//! Prometheus metrics handler
//!
//! `GET /metrics` renders the process-wide recorder installed at startup:
//! HTTP request metrics plus `searches_total`, `listing_views_total` and
//! `access_gate_attempts_total`.

use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
