mod bullets;
mod config;
mod coverage;
mod errors;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::render::{BoundedConverter, DocumentConverter, HttpDocumentConverter, UnconfiguredConverter};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize document converter (HTML → PDF)
    let backend: Arc<dyn DocumentConverter> = match &config.converter_url {
        Some(url) => {
            info!("Document service: {url}");
            Arc::new(
                HttpDocumentConverter::new(url.clone(), config.converter_max_retries)?
                    .with_retry_base(Duration::from_millis(config.converter_retry_base_ms)),
            )
        }
        None => {
            warn!("CONVERTER_URL not set; PDF rendering is disabled");
            Arc::new(UnconfiguredConverter)
        }
    };
    let converter = Arc::new(BoundedConverter::new(
        backend,
        config.converter_max_in_flight,
        Duration::from_secs(config.converter_timeout_secs),
    ));
    info!(
        "Converter limits: {} in flight, {}s timeout, {} retries",
        config.converter_max_in_flight, config.converter_timeout_secs, config.converter_max_retries
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        converter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
