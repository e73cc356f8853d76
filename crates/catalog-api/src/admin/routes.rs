use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use catalog_db::Topic;
use catalog_pipeline::{
    ImportReport, MigrationReport, ValidationSweep, backfill_learning_outcomes,
    backfill_prerequisites, backfill_related_portfolio, export_to_csv, export_to_json,
    import_from_csv, import_from_json_str, migrate_schema, run_all_backfills, validate_store,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, metrics};

/// Create the admin import/export routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/admin/import", post(import_by_format))
        .route("/admin/import/json", post(import_json))
        .route("/admin/import/csv", post(import_csv))
        .route("/admin/export/json", get(export_json))
        .route("/admin/export/csv", get(export_csv))
        .route("/admin/migrate", post(migrate))
        .route("/admin/backfill/{pass}", post(backfill))
        .route("/admin/validate", get(validate))
}

/// Upload formats accepted by the importer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl FromStr for ImportFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ApiError::BadRequest(format!(
                "Unsupported import format: '{other}'. Use json or csv"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImportParams {
    format: String,
}

async fn run_import(state: &ApiState, format: ImportFormat, body: &str) -> ImportReport {
    let mut store = state.store.write().await;
    let (label, report) = match format {
        ImportFormat::Json => ("json", import_from_json_str(&mut store, body)),
        ImportFormat::Csv => ("csv", import_from_csv(&mut store, body)),
    };

    metrics::record_import(label, &report);
    if !report.errors.is_empty() {
        tracing::warn!(
            format = label,
            imported = report.success,
            rejected = report.errors.len(),
            "Import finished with errors"
        );
    }
    report
}

/// Import a file, with the format named by `?format=json|csv`
async fn import_by_format(
    State(state): State<ApiState>,
    Query(params): Query<ImportParams>,
    body: String,
) -> Result<Json<ImportReport>, ApiError> {
    let format = params.format.parse::<ImportFormat>()?;
    Ok(Json(run_import(&state, format, &body).await))
}

async fn import_json(State(state): State<ApiState>, body: String) -> Json<ImportReport> {
    Json(run_import(&state, ImportFormat::Json, &body).await)
}

async fn import_csv(State(state): State<ApiState>, body: String) -> Json<ImportReport> {
    Json(run_import(&state, ImportFormat::Csv, &body).await)
}

async fn export_json(State(state): State<ApiState>) -> Json<Vec<Topic>> {
    let store = state.store.read().await;
    Json(export_to_json(&store))
}

async fn export_csv(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let csv = {
        let store = state.store.read().await;
        export_to_csv(&store)?
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"topics.csv\""),
        ],
        csv,
    )
        .into_response())
}

async fn migrate(State(state): State<ApiState>) -> Json<MigrationReport> {
    let report = migrate_schema(&mut *state.store.write().await);
    metrics::record_migration("schema", &report);
    Json(report)
}

/// Run one backfill pass, or `all` of them
async fn backfill(
    State(state): State<ApiState>,
    Path(pass): Path<String>,
) -> Result<Response, ApiError> {
    let mut store = state.store.write().await;

    let (label, report) = match pass.as_str() {
        "learning-outcomes" => ("learning_outcomes", backfill_learning_outcomes(&mut store)),
        "prerequisites" => ("prerequisites", backfill_prerequisites(&mut store)),
        "related-portfolio" => ("related_portfolio", backfill_related_portfolio(&mut store)),
        "all" => {
            let summary = run_all_backfills(&mut store);
            metrics::record_migration("schema", &summary.schema);
            metrics::record_migration("learning_outcomes", &summary.learning_outcomes);
            metrics::record_migration("prerequisites", &summary.prerequisites);
            metrics::record_migration("related_portfolio", &summary.related_portfolio);
            return Ok(Json(summary).into_response());
        }
        other => {
            return Err(ApiError::NotFound(format!("unknown backfill pass '{other}'")));
        }
    };

    metrics::record_migration(label, &report);
    Ok(Json(report).into_response())
}

async fn validate(State(state): State<ApiState>) -> Json<ValidationSweep> {
    let store = state.store.read().await;
    Json(validate_store(&store))
}
