//! Error types for the relay and the chat widget's relay client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure talking to the external text-generation provider.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// A stream frame could not be decoded.
    #[error("malformed provider frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// The byte stream is not valid UTF-8.
    #[error("stream is not valid UTF-8")]
    Utf8,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}

/// Failure of a chat turn as seen by the widget.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure reaching the relay.
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid relay base URL.
    #[error("invalid relay URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Relay answered with a non-success status.
    #[error("relay returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        message: String,
    },

    /// The relay stream failed after it started.
    #[error(transparent)]
    Stream(#[from] RelayError),
}
