use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use catalog_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    catalog_api::tracing::init_tracing(&config.env);

    let metrics_handle = catalog_api::metrics::init_metrics()?;

    let state = ApiState::new(&config);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(catalog_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = catalog_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(catalog_api::router::cors_layer(&config.allowed_origins))
        .layer(trace_layer)
        .layer(middleware::from_fn(catalog_api::metrics::track_metrics));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, environment = ?config.env, "Catalog server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
