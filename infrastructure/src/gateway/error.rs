//! Error types for the HTTP gateway adapter

use mirai_application::TransportError;
use thiserror::Error;

/// Result type alias for HTTP adapter internals
pub type Result<T> = std::result::Result<T, HttpTransportError>;

/// Errors raised while talking HTTP to the gateway
#[derive(Error, Debug)]
pub enum HttpTransportError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Gateway rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },
}

impl From<HttpTransportError> for TransportError {
    fn from(err: HttpTransportError) -> Self {
        match err {
            HttpTransportError::Client(e) if e.is_timeout() => TransportError::Timeout,
            HttpTransportError::Client(e) => match e.status() {
                Some(status) => TransportError::Http {
                    status: status.as_u16(),
                },
                None if e.is_decode() => TransportError::Decode(e.to_string()),
                None => TransportError::Unreachable(e.to_string()),
            },
            HttpTransportError::Status { status } => TransportError::Http { status },
            HttpTransportError::ParseError { error, .. } => TransportError::Decode(error),
            HttpTransportError::Rejected { code, message } => {
                TransportError::Rejected { code, message }
            }
        }
    }
}
