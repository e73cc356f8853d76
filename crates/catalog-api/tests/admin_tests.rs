use crate::common::{self, CSV_HEADER};
use axum::http::{StatusCode, header};
use catalog_db::{DEFAULT_AUTHOR_ID, Topic};
use catalog_pipeline::{BackfillSummary, ImportReport, MigrationReport, ValidationSweep};
use serde_json::{Value, json};

#[tokio::test]
async fn test_import_json_into_empty_store() {
    let (client, state) = common::empty_app();

    let response = client
        .post_json(
            "/admin/import/json",
            &json!([{
                "id": "9",
                "title": "T",
                "slug": "t",
                "description": "D",
                "tags": ["x"],
                "difficulty": "Beginner",
                "duration_estimate": 30
            }]),
        )
        .await;
    response.assert_status(StatusCode::OK);

    let report: ImportReport = response.json();
    assert_eq!(report, ImportReport { success: 1, errors: vec![] });

    let store = state.store.read().await;
    let topic = store.get_by_slug("t").expect("topic imported");
    assert!(!topic.is_featured);
    assert_eq!(topic.author_id.as_deref(), Some(DEFAULT_AUTHOR_ID));
    assert!(topic.created_at.is_some());
    assert!(topic.updated_at.is_some());
}

#[tokio::test]
async fn test_import_json_reports_bad_rows() {
    let (client, _) = common::empty_app();

    let records = json!([
        {"id": "1", "title": "A", "slug": "a", "description": "D", "tags": [], "difficulty": "Expert", "duration_estimate": 30},
        {"id": "2", "title": "B", "slug": "b", "description": "D", "tags": [], "difficulty": "Beginner", "duration_estimate": 0},
        {"id": "3", "title": "C", "slug": "c", "description": "D", "tags": [], "difficulty": "Beginner", "duration_estimate": "45"},
        {"id": "4", "title": "D", "slug": "d", "description": "D", "tags": [], "difficulty": "Beginner", "duration_estimate": 45}
    ]);

    let report: ImportReport = client.post_json("/admin/import/json", &records).await.json();

    assert_eq!(report.success, 1);
    assert_eq!(
        report.errors,
        vec![
            "Row 1: Invalid difficulty: Expert",
            "Row 2: Missing required field: duration_estimate",
            "Row 3: Invalid duration_estimate: 45",
        ]
    );
}

#[tokio::test]
async fn test_import_invalid_json_text() {
    let (client, _) = common::empty_app();

    let response = client
        .post_text("/admin/import/json", "application/json", "{not json")
        .await;
    response.assert_status(StatusCode::OK);

    let report: ImportReport = response.json();
    assert_eq!(report.success, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_import_csv_then_fetch() {
    let (client, _) = common::empty_app();

    let csv = format!(
        "{CSV_HEADER},is_featured\n\
         10,Graph Neural Networks,gnn,Learning on graphs,graphs;deep-learning,Advanced,150,TRUE"
    );
    let report: ImportReport = client
        .post_text("/admin/import/csv", "text/csv", &csv)
        .await
        .json();
    assert_eq!(report, ImportReport { success: 1, errors: vec![] });

    let response = client.get("/topics/gnn").await;
    response.assert_status(StatusCode::OK);

    let topic: Topic = response.json();
    assert_eq!(topic.tags, vec!["graphs", "deep-learning"]);
    assert_eq!(topic.duration_estimate, 150);
    assert!(topic.is_featured);
}

#[tokio::test]
async fn test_import_csv_header_only() {
    let (client, _) = common::empty_app();

    let report: ImportReport = client
        .post_text("/admin/import/csv", "text/csv", CSV_HEADER)
        .await
        .json();

    assert_eq!(report.success, 0);
    assert_eq!(
        report.errors,
        vec!["CSV must have at least a header row and one data row"]
    );
}

#[tokio::test]
async fn test_import_by_format_query() {
    let (client, state) = common::empty_app();

    let csv = format!("{CSV_HEADER}\n1,A,a,D,x,Beginner,30");
    let response = client
        .post_text("/admin/import?format=csv", "text/csv", &csv)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<ImportReport>().success, 1);
    assert!(state.store.read().await.get_by_slug("a").is_some());

    let response = client
        .post_text("/admin/import?format=xml", "text/xml", "<topics/>")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_import_replaces_existing_slug_in_place() {
    let (client, state) = common::seeded_app();
    let total = state.store.read().await.len();

    let csv = format!("{CSV_HEADER}\n99,RAG Revisited,building-rag-pipelines,New,rag,Advanced,200");
    let report: ImportReport = client
        .post_text("/admin/import/csv", "text/csv", &csv)
        .await
        .json();
    assert_eq!(report.success, 1);

    let topics: Vec<Topic> = client.get("/topics").await.json();
    assert_eq!(topics.len(), total);
    assert_eq!(topics[2].slug, "building-rag-pipelines");
    assert_eq!(topics[2].id, "99");
    assert_eq!(topics[2].title, "RAG Revisited");
}

#[tokio::test]
async fn test_export_csv_round_trip() {
    let (client, _) = common::seeded_app();

    let response = client.get("/admin/export/csv").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );

    let csv = response.text();
    assert!(csv.starts_with("\"id\",\"title\",\"slug\""));

    let (fresh, fresh_state) = common::empty_app();
    let report: ImportReport = fresh
        .post_text("/admin/import/csv", "text/csv", &csv)
        .await
        .json();
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let exported: Vec<Topic> = client.get("/topics").await.json();
    let reimported = fresh_state.store.read().await.all();
    assert_eq!(report.success, exported.len());

    for (before, after) in exported.iter().zip(&reimported) {
        assert_eq!(before.slug, after.slug);
        assert_eq!(before.tags, after.tags);
        assert_eq!(before.difficulty, after.difficulty);
        assert_eq!(before.duration_estimate, after.duration_estimate);
        assert_eq!(before.is_featured, after.is_featured);
        assert_eq!(before.learning_outcomes, after.learning_outcomes);
    }
}

#[tokio::test]
async fn test_export_json_round_trip() {
    let (client, _) = common::seeded_app();

    let exported: Vec<Value> = client.get("/admin/export/json").await.json();

    let (fresh, fresh_state) = common::empty_app();
    let report: ImportReport = fresh.post_json("/admin/import/json", &exported).await.json();

    assert_eq!(report.success, exported.len());
    assert!(report.errors.is_empty());
    assert_eq!(fresh_state.store.read().await.len(), exported.len());
}

#[tokio::test]
async fn test_migrate_and_backfill() {
    let (client, state) = common::seeded_app();
    let total = state.store.read().await.len();

    let report: MigrationReport = client.post("/admin/migrate").await.json();
    assert_eq!(report, MigrationReport { updated: total, total });

    let report: MigrationReport = client.post("/admin/backfill/learning-outcomes").await.json();
    assert!(report.updated > 0);
    let report: MigrationReport = client.post("/admin/backfill/learning-outcomes").await.json();
    assert_eq!(report.updated, 0);

    let summary: BackfillSummary = client.post("/admin/backfill/all").await.json();
    assert_eq!(summary.schema.updated, 0);
    assert_eq!(summary.learning_outcomes.updated, 0);
    assert!(summary.prerequisites.updated > 0);
    assert!(summary.related_portfolio.updated > 0);

    client
        .post("/admin/backfill/everything")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_store() {
    let (client, _) = common::seeded_app();

    let response = client.get("/admin/validate").await;
    response.assert_status(StatusCode::OK);

    let sweep: ValidationSweep = response.json();
    assert!(sweep.invalid.is_empty());
    assert!(sweep.valid > 0);
}
