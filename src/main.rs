//! Crypto AI Trader server
//!
//! Entry point: loads configuration, initializes logging and serves the page
//! and the chat relay.

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use mimalloc::MiMalloc;

use crypto_ai_trader::{config::AppConfig, server, telemetry};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before reading any configuration
    let _ = dotenv();

    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(config.log.json);

    let settings = config
        .provider_settings()
        .context("invalid provider configuration")?;

    server::start_server(Arc::new(config), settings).await
}
