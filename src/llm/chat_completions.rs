//! OpenAI-compatible Chat Completions driver.
//!
//! This module implements the [`TextGenerator`] trait for the Chat Completions
//! API, streaming back only the assistant's text deltas.

use futures::{Stream, StreamExt};

use crate::error::RelayError;

use super::{GenerationRequest, ProviderSettings, TextGenerator, TextStream};

/// Driver for the Chat Completions API.
///
/// Posts to the provider's `chat/completions` URL with `stream: true` and
/// yields each `delta.content` as it arrives.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("base_url", &self.settings.base_url)
            .field("model", &self.settings.model)
            .field("provider", &self.settings.provider)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a new Chat Completions driver with the given settings.
    #[must_use]
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    /// Request body sent to the provider.
    fn body(&self, req: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.settings.model,
            "stream": true,
            "messages": req.messages,
            "temperature": req.params.temperature,
            "max_tokens": req.params.max_tokens,
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for ChatCompletionsDriver {
    async fn stream(&self, req: GenerationRequest) -> Result<TextStream, RelayError> {
        let url = self
            .settings
            .provider
            .build_chat_url(&self.settings.base_url);

        let mut rb = self.http.post(&url).json(&self.body(&req));
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Box::pin(text_deltas(resp.bytes_stream())))
    }
}

/// Decode a server-sent-event byte stream into assistant text deltas.
///
/// Frames are separated by a blank line, with either LF or CRLF line endings.
/// `data: [DONE]` ends the stream. A last frame without the trailing blank
/// line is still decoded when the byte stream ends.
pub(crate) fn text_deltas<S, B, E>(byte_stream: S) -> impl Stream<Item = Result<String, RelayError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]>,
    E: Into<RelayError>,
{
    async_stream::try_stream! {
        let mut buf = Vec::<u8>::new();
        let mut done = false;

        futures::pin_mut!(byte_stream);
        'frames: while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(Into::<RelayError>::into)?;
            // JSON payloads never carry a raw CR, so CRLF folds to LF safely.
            buf.extend(chunk.as_ref().iter().copied().filter(|&b| b != b'\r'));

            while let Some(pos) = find_double_newline(&buf) {
                let frame = buf.drain(..pos + 2).collect::<Vec<_>>();
                let decoded = decode_frame(&String::from_utf8_lossy(&frame))?;
                for delta in decoded.deltas {
                    yield delta;
                }
                if decoded.done {
                    done = true;
                    break 'frames;
                }
            }
        }

        if !done {
            let rest = String::from_utf8_lossy(&buf).into_owned();
            if !rest.trim().is_empty() {
                for delta in decode_frame(&rest)?.deltas {
                    yield delta;
                }
            }
        }
    }
}

/// Text carried by one frame, and whether it held the `[DONE]` marker.
#[derive(Debug, Default)]
struct DecodedFrame {
    deltas: Vec<String>,
    done: bool,
}

fn decode_frame(text: &str) -> Result<DecodedFrame, RelayError> {
    let mut decoded = DecodedFrame::default();

    for line in text.lines() {
        let line = line.trim();
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        if data == "[DONE]" {
            decoded.done = true;
            break;
        }

        let v: serde_json::Value = serde_json::from_str(data)?;
        if let Some(s) = v["choices"][0]["delta"]["content"].as_str()
            && !s.is_empty()
        {
            decoded.deltas.push(s.to_string());
        }
    }

    Ok(decoded)
}

/// Find the position of a double newline in the buffer.
fn find_double_newline(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Message, Provider};

    fn frames(chunks: &[&'static str]) -> Vec<String> {
        let input = futures::stream::iter(
            chunks
                .iter()
                .map(|c| Ok::<_, RelayError>(c.as_bytes().to_vec()))
                .collect::<Vec<_>>(),
        );
        let out = futures::executor::block_on(text_deltas(input).collect::<Vec<_>>());
        out.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn yields_content_deltas_in_order() {
        let out = frames(&[
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\ndata: [DONE]\n\n",
        ]);
        assert_eq!(out, vec!["Hel", "lo"]);
    }

    #[test]
    fn reassembles_frames_split_across_chunks() {
        let out = frames(&[
            "data: {\"choices\":[{\"delta\":{\"con",
            "tent\":\"BTC\"}}]}\n",
            "\n: keep-alive\n\n",
        ]);
        assert_eq!(out, vec!["BTC"]);
    }

    #[test]
    fn stops_at_done_marker() {
        let out = frames(&[
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n",
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let out = frames(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\r\n\r",
            "\ndata: {\"choices\":[{\"delta\":{\"content\":\" trader\"}}]}\r\n\r\n",
            "data: [DONE]\r\n\r\n",
        ]);
        assert_eq!(out, vec!["Hello", " trader"]);
    }

    #[test]
    fn decodes_last_frame_without_blank_line() {
        let out = frames(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n",
        ]);
        assert_eq!(out, vec!["Hi", " there"]);
    }

    #[test]
    fn trailing_keep_alive_is_ignored() {
        let out = frames(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            ": ping\n",
        ]);
        assert_eq!(out, vec!["Hi"]);
    }

    #[test]
    fn malformed_frame_is_an_error() {
        let input = futures::stream::iter(vec![Ok::<_, RelayError>(b"data: {oops\n\n".to_vec())]);
        let out = futures::executor::block_on(text_deltas(input).collect::<Vec<_>>());
        assert!(matches!(out.as_slice(), [Err(RelayError::Decode(_))]));
    }

    #[test]
    fn body_includes_fixed_params() {
        let driver = ChatCompletionsDriver::new(ProviderSettings {
            base_url: "https://api.deepseek.com".to_string(),
            api_key: None,
            model: "deepseek-chat".to_string(),
            provider: Provider::DeepSeek,
        });
        let body = driver.body(&GenerationRequest::new(vec![Message::user("hi")]));

        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 800);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["content"], "hi");
    }
}
