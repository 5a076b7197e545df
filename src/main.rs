use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use gestor_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    // Persistence collaborator
    let store: Arc<dyn api::storage::MovementStore> =
        Arc::new(api::storage::JsonFileStore::new(cfg.data_path.clone()));

    // Summarization collaborator
    let summarizer: Arc<dyn api::services::insights::Summarizer> =
        Arc::new(api::services::insights::HttpSummarizer::new(
            cfg.insights_api_url.clone(),
            cfg.insights_api_key.clone(),
            cfg.insights_model.clone(),
        ));
    if cfg.insights_api_key.is_empty() {
        info!("insights API key not configured; summaries will use the fallback text");
    }

    // Lifecycle events
    let (event_sender, event_rx) = api::events::channel(1024);
    tokio::spawn(api::events::process_events(event_rx));

    // Compose shared app state and seed the movement collection
    let app_state = api::AppState::build(cfg.clone(), store, summarizer, event_sender);
    app_state
        .movements
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("failed to load movement collection: {}", e))?;

    // Build CORS layer from config
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    let cors_layer = if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.is_development() {
        info!("using permissive CORS (development environment, no explicit origins)");
        CorsLayer::permissive()
    } else {
        error!("missing CORS configuration; set APP_CORS_ALLOWED_ORIGINS");
        anyhow::bail!("missing CORS configuration: set APP_CORS_ALLOWED_ORIGINS");
    };

    let app = api::app_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("gestor-api listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
