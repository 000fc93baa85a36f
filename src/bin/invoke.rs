//! Function-runtime entry point: one invocation event on stdin, one
//! response event on stdout.

use std::sync::Arc;

use anyhow::Context;
use coach_relay::{
    adapter::{InvocationEvent, handle_event},
    build_app,
    config::AppConfig,
    state::AppState,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the response event, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coach_relay=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read invocation event")?;
    let event: InvocationEvent =
        serde_json::from_str(&input).context("malformed invocation event")?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = build_app(Arc::new(AppState::from_config(config)));

    let response = handle_event(app, event).await?;
    let output = serde_json::to_vec(&response)?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;
    Ok(())
}
