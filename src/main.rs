use std::sync::Arc;

use anyhow::Context;
use coach_relay::{build_app, config::AppConfig, cors::CorsPolicy, state::AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coach_relay=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if !config.has_api_key() {
        warn!("OPENAI_API_KEY is not set; /api/chat will answer 500 until it is");
    }

    let bind_addr = config.bind_addr.clone();
    info!(
        cors = CorsPolicy::from_config(&config).mode(),
        model = %config.model,
        base_url = %config.base_url,
        "starting coach relay"
    );

    let app = build_app(Arc::new(AppState::from_config(config)));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("coach relay listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
