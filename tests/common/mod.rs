#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use crypto_ai_trader::AppState;
use crypto_ai_trader::config::{AppConfig, LogConfig, ProviderConfig, ServerConfig};
use crypto_ai_trader::error::RelayError;
use crypto_ai_trader::llm::{GenerationRequest, TextGenerator, TextStream};

/// Generator that records every request and replies with fixed fragments.
#[derive(Default)]
pub struct RecordingGenerator {
    pub requests: Mutex<Vec<GenerationRequest>>,
    pub reply: Vec<&'static str>,
    /// Fail before streaming with this upstream status.
    pub reject_with: Option<u16>,
    /// Fail the stream after this many fragments.
    pub break_after: Option<usize>,
}

impl RecordingGenerator {
    pub fn replying(reply: Vec<&'static str>) -> Self {
        Self {
            reply,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TextGenerator for RecordingGenerator {
    async fn stream(&self, req: GenerationRequest) -> Result<TextStream, RelayError> {
        self.requests.lock().unwrap().push(req);

        if let Some(status) = self.reject_with {
            return Err(RelayError::Status {
                status,
                body: "upstream unavailable".to_string(),
            });
        }

        let mut items: Vec<Result<String, RelayError>> =
            self.reply.iter().map(|s| Ok((*s).to_string())).collect();
        if let Some(n) = self.break_after {
            items.truncate(n);
            items.push(Err(RelayError::Utf8));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        provider: ProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
            api_key: None,
        },
        log: LogConfig { json: false },
    }
}

pub fn state_with(generator: Arc<dyn TextGenerator>) -> AppState {
    AppState {
        generator,
        config: Arc::new(test_config()),
    }
}

/// Serve `app` on an ephemeral local port and return its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
