use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, ServerConfig};
use hai_core::{AssistantService, CoreConfig};

/// Main entry point for the Hospital AI server
///
/// Resolves configuration once, constructs the inference client, and serves the REST API until
/// Ctrl-C is received.
///
/// # Environment Variables
/// - `GROQ_API_KEY`: inference API key (requests fail with 503 while unset)
/// - `GROQ_API_BASE`, `GROQ_MODEL`, `HAI_INFERENCE_TIMEOUT_SECS`: inference client settings
/// - `HAI_EXTRACTION_STRATEGY`, `HAI_MEDICINE_FALLBACK`: medicine analysis behaviour
/// - `HAI_REST_ADDR`: server address (default: "0.0.0.0:8000")
/// - `HAI_STATIC_DIR`: frontend bundle directory (default: "static")
/// - `HAI_MAX_UPLOAD_BYTES`: request body limit (default: 2 MiB)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hospital_ai=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("hai_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let core_cfg = Arc::new(CoreConfig::from_env()?);
    let server_cfg = ServerConfig::from_env()?;

    let service = AssistantService::with_groq(core_cfg.clone())?;
    if service.is_inference_configured() {
        tracing::info!("++ Inference model {}", service.model());
    } else {
        tracing::warn!("GROQ_API_KEY is not set; /chat and /medicine-analyze will return 503");
    }
    if let Some(fallback) = core_cfg.medicine_fallback() {
        tracing::warn!("unreadable uploads will be analysed as {}", fallback);
    }
    if !server_cfg.static_dir().is_dir() {
        tracing::warn!(
            "static directory {} does not exist; GET / will return 404",
            server_cfg.static_dir().display()
        );
    }

    let state = AppState::new(service, server_cfg.static_dir().to_path_buf());
    let app = api_rest::router(state, server_cfg.max_upload_bytes());

    tracing::info!("++ Starting Hospital AI REST on {}", server_cfg.addr());
    let listener = tokio::net::TcpListener::bind(server_cfg.addr()).await?;
    api_rest::serve(listener, app, shutdown_signal()).await?;

    tracing::info!("-- Hospital AI stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
