//! Text-generation driver traits and implementations.
//!
//! The relay endpoint forwards a conversation to an external provider through
//! the [`TextGenerator`] trait and streams back whatever text it produces.
//!
//! # Drivers
//!
//! - [`ChatCompletionsDriver`]: OpenAI-compatible Chat Completions API
//!   (DeepSeek, `OpenAI`, `OpenRouter`, Groq, ...)
//!
//! # Example
//!
//! ```rust,ignore
//! use crypto_ai_trader::llm::{ChatCompletionsDriver, ProviderSettings, Provider};
//!
//! let settings = ProviderSettings {
//!     base_url: "https://api.deepseek.com".to_string(),
//!     api_key: Some("sk-...".to_string()),
//!     model: "deepseek-chat".to_string(),
//!     provider: Provider::DeepSeek,
//! };
//! let driver = ChatCompletionsDriver::new(settings);
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsDriver;
pub use provider::Provider;

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Temperature sent with every relayed conversation.
pub const TEMPERATURE: f32 = 0.7;

/// Maximum response length sent with every relayed conversation.
pub const MAX_TOKENS: u32 = 800;

/// Provider connection and model settings.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Base URL for the provider API (e.g., `https://api.deepseek.com`).
    pub base_url: String,
    /// Optional API key, sent as a bearer token.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `deepseek-chat`).
    pub model: String,
    /// Provider type (detected from `base_url`).
    pub provider: Provider,
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

impl MessageRole {
    /// Label shown in front of the message in the transcript.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You: ",
            Self::Assistant => "AI: ",
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text content.
    pub content: String,
}

impl Message {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Fixed sampling parameters attached to each request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Request to a text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Conversation messages, oldest first.
    pub messages: Vec<Message>,
    /// Sampling parameters.
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// Build a request carrying the fixed generation parameters.
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            params: GenerationParams::default(),
        }
    }
}

/// Lazy, finite stream of generated text fragments in arrival order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

/// Trait for streaming text generators.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Start a generation and stream its text fragments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the provider rejects it.
    async fn stream(&self, req: GenerationRequest) -> Result<TextStream, RelayError>;
}
