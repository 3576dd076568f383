//! Chat widget state.
//!
//! The widget owns the transcript for as long as it lives: it starts empty and
//! is gone when the widget is dropped. A turn appends the user's message, calls
//! the relay, and grows the assistant's reply fragment by fragment.
//!
//! # Example
//!
//! ```rust
//! use crypto_ai_trader::chat::ChatWidget;
//! use crypto_ai_trader::llm::MessageRole;
//!
//! let mut widget = ChatWidget::new();
//! widget.set_input("Hello");
//! let history = widget.submit();
//! assert_eq!(history.len(), 1);
//!
//! widget.append_fragment("Hi");
//! widget.append_fragment(" there");
//! assert_eq!(widget.transcript()[1].role, MessageRole::Assistant);
//! assert_eq!(widget.transcript()[1].content, "Hi there");
//! ```

mod client;

pub use client::{HttpRelayClient, RelayClient};

use futures::StreamExt;

use crate::error::ClientError;
use crate::llm::{Message, MessageRole};

/// How a chat turn ended.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The reply stream ran to completion.
    Completed {
        /// Number of fragments appended.
        fragments: usize,
    },
    /// The relay failed; the transcript keeps whatever arrived before.
    Stalled {
        /// What went wrong.
        error: ClientError,
    },
}

impl TurnOutcome {
    /// Whether the reply stream ran to completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Conversation transcript plus the controlled input value.
#[derive(Debug, Clone, Default)]
pub struct ChatWidget {
    transcript: Vec<Message>,
    input: String,
}

impl ChatWidget {
    /// Create an empty widget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages so far, oldest first.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Current input value.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input value.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Move the input into the transcript as a user message and return the
    /// conversation to send. Empty input is not blocked.
    pub fn submit(&mut self) -> Vec<Message> {
        let content = std::mem::take(&mut self.input);
        self.transcript.push(Message::user(content));
        self.transcript.clone()
    }

    /// Append a streamed fragment to the assistant's reply, starting the reply
    /// if the last message is the user's.
    pub fn append_fragment(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        match self.transcript.last_mut() {
            Some(last) if last.role == MessageRole::Assistant => last.content.push_str(fragment),
            _ => self.transcript.push(Message::assistant(fragment)),
        }
    }

    /// Run one turn: submit the input, relay the conversation and append the
    /// reply as it streams in.
    ///
    /// A failed relay leaves the transcript as it was when the failure
    /// happened; nothing is added to report it.
    pub async fn send<C>(&mut self, client: &C) -> TurnOutcome
    where
        C: RelayClient + ?Sized,
    {
        let history = self.submit();

        let mut stream = match client.relay(history).await {
            Ok(stream) => stream,
            Err(error) => return self.stall(error),
        };

        let mut fragments = 0;
        while let Some(next) = stream.next().await {
            match next {
                Ok(fragment) if fragment.is_empty() => {}
                Ok(fragment) => {
                    self.append_fragment(&fragment);
                    fragments += 1;
                }
                Err(e) => return self.stall(ClientError::Stream(e)),
            }
        }

        TurnOutcome::Completed { fragments }
    }

    fn stall(&self, error: ClientError) -> TurnOutcome {
        tracing::warn!(
            name: "chat.turn.stalled",
            error = %error,
            transcript_len = self.transcript.len(),
            "Chat turn stalled"
        );
        TurnOutcome::Stalled { error }
    }
}
