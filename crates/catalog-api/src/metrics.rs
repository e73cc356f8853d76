//! Prometheus metrics for request traffic and catalog imports.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use catalog_pipeline::{ImportReport, MigrationReport};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static TOPIC_BY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/topics/by-id/[^/]+$").expect("valid regex"));
static TOPIC_BY_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/topics/[^/]+$").expect("valid regex"));
static BACKFILL_PASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/admin/backfill/[^/]+$").expect("valid regex"));

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Collapse slugs and ids so paths keep a bounded label set
fn normalize_path(path: &str) -> String {
    if path == "/topics/stats" {
        return path.to_string();
    }
    if TOPIC_BY_ID.is_match(path) {
        return "/topics/by-id/:id".to_string();
    }
    if TOPIC_BY_SLUG.is_match(path) {
        return "/topics/:slug".to_string();
    }
    if BACKFILL_PASS.is_match(path) {
        return "/admin/backfill/:pass".to_string();
    }
    path.to_string()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record the outcome of an import batch
pub fn record_import(format: &'static str, report: &ImportReport) {
    counter!("topic_import_rows_total", "format" => format, "outcome" => "accepted")
        .increment(report.success as u64);
    counter!("topic_import_rows_total", "format" => format, "outcome" => "rejected")
        .increment(report.failed() as u64);
}

/// Record how many topics a migration pass changed
pub fn record_migration(pass: &'static str, report: &MigrationReport) {
    counter!("topic_migration_updates_total", "pass" => pass).increment(report.updated as u64);
}
