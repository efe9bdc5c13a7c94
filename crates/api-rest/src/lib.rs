//! # API REST
//!
//! REST API implementation for Hospital AI.
//!
//! Handles:
//! - HTTP endpoints with axum (`/chat`, `/medicine-analyze`, `/health`, `/`)
//! - Static frontend files under `/static`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON error contract, CORS, upload limits, request tracing)
//!
//! Uses `api-shared` for wire types and `hai-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use hai_core::AssistantService;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
///
/// Holds the assistant service (which owns the injected inference client) and the directory
/// the frontend bundle is served from. Cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub service: AssistantService,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(service: AssistantService, static_dir: PathBuf) -> Self {
        Self {
            service,
            static_dir: Arc::new(static_dir),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::chat, handlers::medicine_analyze),
    components(schemas(
        api_shared::ChatReq,
        api_shared::ChatRes,
        api_shared::ErrorRes,
        api_shared::HealthRes,
        api_shared::MedicineAnalyzeRes,
        handlers::MedicineUpload,
    ))
)]
pub struct ApiDoc;

/// Build the application router.
///
/// `max_upload_bytes` bounds request bodies; the multipart extractor enforces it while reading.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let static_files = ServeDir::new(state.static_dir.as_path());

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/medicine-analyze", post(handlers::medicine_analyze))
        .nest_service("/static", static_files)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

/// Serve `app` on `listener` until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the HTTP server fails while running.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("-- Hospital AI REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
