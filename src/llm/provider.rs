//! Provider-specific configuration and detection.
//!
//! Every supported provider speaks the OpenAI-compatible Chat Completions
//! protocol; they differ only in the URL layout.

/// Supported text-generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `DeepSeek` (api.deepseek.com)
    DeepSeek,
    /// `OpenAI` (api.openai.com)
    OpenAI,
    /// `OpenRouter` (openrouter.ai)
    OpenRouter,
    /// Groq (groq.com)
    Groq,
    /// Generic OpenAI-compatible provider
    Generic,
}

impl Provider {
    /// Detect provider from base URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crypto_ai_trader::llm::Provider;
    ///
    /// let provider = Provider::detect_from_url("https://api.deepseek.com");
    /// assert_eq!(provider, Provider::DeepSeek);
    /// ```
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();

        if lower.contains("deepseek.com") {
            Self::DeepSeek
        } else if lower.contains("openrouter.ai") {
            Self::OpenRouter
        } else if lower.contains("groq.com") {
            Self::Groq
        } else if lower.contains("openai.com") {
            Self::OpenAI
        } else {
            Self::Generic
        }
    }

    /// Build the chat completions URL for this provider.
    ///
    /// `OpenRouter` and Groq expect the `/api/v1` and `/openai/v1` prefixes to be
    /// part of the configured base URL.
    #[must_use]
    pub fn build_chat_url(self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');

        match self {
            Self::DeepSeek | Self::OpenRouter | Self::Groq => format!("{base}/chat/completions"),
            Self::OpenAI | Self::Generic => format!("{base}/v1/chat/completions"),
        }
    }
}
