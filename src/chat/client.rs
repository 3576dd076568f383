//! Relay client used by the chat widget.

use futures::{Stream, StreamExt};
use url::Url;

use crate::error::{ClientError, RelayError};
use crate::llm::{Message, TextStream};
use crate::server::ChatRequest;

/// Something that can relay a conversation and stream back the reply.
#[async_trait::async_trait]
pub trait RelayClient: Send + Sync {
    /// Send the conversation and return the reply as a stream of fragments.
    async fn relay(&self, messages: Vec<Message>) -> Result<TextStream, ClientError>;
}

/// HTTP client for `POST /api/chat`.
///
/// # Example
///
/// ```rust,no_run
/// use crypto_ai_trader::chat::{ChatWidget, HttpRelayClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpRelayClient::new("http://localhost:3000")?;
/// let mut widget = ChatWidget::new();
/// widget.set_input("Should I buy ETH?");
/// widget.send(&client).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpRelayClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url.as_ref())?;
        // Keep a mount path such as `/app` when joining the relative endpoint.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("api/chat")?;
        Ok(Self { endpoint, http })
    }

    /// Full URL of the relay endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RelayClient for HttpRelayClient {
    async fn relay(&self, messages: Vec<Message>) -> Result<TextStream, ClientError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ChatRequest { messages })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Box::pin(utf8_chunks(response.bytes_stream())))
    }
}

/// Decode a byte stream into text, holding back split multi-byte sequences
/// until the rest of the character arrives.
pub(crate) fn utf8_chunks<S, B, E>(byte_stream: S) -> impl Stream<Item = Result<String, RelayError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]>,
    E: Into<RelayError>,
{
    async_stream::try_stream! {
        let mut pending = Vec::<u8>::new();

        futures::pin_mut!(byte_stream);
        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(Into::<RelayError>::into)?;
            pending.extend_from_slice(chunk.as_ref());

            let valid = match std::str::from_utf8(&pending) {
                Ok(_) => pending.len(),
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(_) => Err::<usize, _>(RelayError::Utf8)?,
            };
            if valid > 0 {
                let bytes = pending.drain(..valid).collect::<Vec<_>>();
                yield String::from_utf8_lossy(&bytes).into_owned();
            }
        }

        if !pending.is_empty() {
            Err::<(), _>(RelayError::Utf8)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(chunks: Vec<Vec<u8>>) -> Vec<Result<String, RelayError>> {
        let input = futures::stream::iter(chunks.into_iter().map(Ok::<_, RelayError>));
        futures::executor::block_on(utf8_chunks(input).collect::<Vec<_>>())
    }

    #[test]
    fn passes_ascii_through() {
        let out = decode(vec![b"Buy ".to_vec(), b"low".to_vec()]);
        let text: Vec<String> = out.into_iter().map(Result::unwrap).collect();
        assert_eq!(text, vec!["Buy ", "low"]);
    }

    #[test]
    fn joins_split_multibyte_character() {
        let euro = "€".as_bytes();
        let out = decode(vec![euro[..1].to_vec(), euro[1..].to_vec()]);
        let text: Vec<String> = out.into_iter().map(Result::unwrap).collect();
        assert_eq!(text, vec!["€"]);
    }

    #[test]
    fn truncated_character_is_an_error() {
        let euro = "€".as_bytes();
        let out = decode(vec![euro[..2].to_vec()]);
        assert!(matches!(out.as_slice(), [Err(RelayError::Utf8)]));
    }

    #[test]
    fn endpoint_is_joined_onto_base() {
        let client = HttpRelayClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:3000/api/chat");
    }

    #[test]
    fn endpoint_keeps_mount_path() {
        for base in ["http://host/app", "http://host/app/"] {
            let client = HttpRelayClient::new(base).unwrap();
            assert_eq!(client.endpoint().as_str(), "http://host/app/api/chat");
        }
        let client = HttpRelayClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:3000/api/chat");
    }
}
