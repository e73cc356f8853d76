use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use catalog_db::{CatalogStats, Topic};
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

/// Create the topic routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/topics", get(get_all_topics))
        .route("/topics/stats", get(get_stats))
        .route("/topics/by-id/{id}", get(get_topic_by_id))
        .route("/topics/{slug}", get(get_topic_by_slug).delete(delete_topic))
}

/// Get all topics, in catalog order
async fn get_all_topics(State(state): State<ApiState>) -> Json<Vec<Topic>> {
    Json(state.store.read().await.all())
}

async fn get_stats(State(state): State<ApiState>) -> Json<CatalogStats> {
    Json(state.store.read().await.stats())
}

async fn get_topic_by_slug(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<Topic>, ApiError> {
    let store = state.store.read().await;
    store
        .get_by_slug(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no topic with slug '{slug}'")))
}

async fn get_topic_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Topic>, ApiError> {
    let store = state.store.read().await;
    store
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no topic with id '{id}'")))
}

/// Delete a topic. Deleting an unknown slug is not an error.
async fn delete_topic(State(state): State<ApiState>, Path(slug): Path<String>) -> Json<Value> {
    let deleted = state.store.write().await.delete(&slug);

    if deleted {
        tracing::info!(%slug, "Topic deleted");
    } else {
        tracing::debug!(%slug, "Delete requested for unknown topic");
    }

    Json(json!({
        "deleted": deleted,
        "slug": slug,
    }))
}
