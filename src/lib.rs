//! Crypto AI Trader
//!
//! A single page that puts an AI chat assistant next to a trading form.
//! The chat streams through a relay endpoint to an external text-generation
//! provider; the trading form is a stub that only reports what the user asked
//! for.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server serving the page and the relay
//! - **Relay**: `POST /api/chat` forwards the conversation and streams text back
//! - **Chat widget**: transcript state fed by the relay stream
//! - **Trade form**: amount + currency, reports buy/sell intents locally
//!
//! # Modules
//!
//! - [`llm`]: Text-generation driver trait and the Chat Completions driver
//! - [`server`]: Router, page and relay handlers
//! - [`chat`]: Chat widget state and relay client
//! - [`trade`]: Trade form stub
//! - [`ui`]: HTML page shell

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod server;
pub mod telemetry;
pub mod trade;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::TextGenerator;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Text generator the relay forwards conversations to.
    pub generator: Arc<dyn TextGenerator>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}
