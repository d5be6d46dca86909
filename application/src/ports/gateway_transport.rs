//! Gateway transport port
//!
//! Defines the calls the session core makes against the remote gateway.
//! An implementation is bound to one gateway endpoint; the wire encoding is
//! entirely its own business.

use async_trait::async_trait;
use mirai_domain::{BotId, Message, OutboundMessage, SessionKey};
use thiserror::Error;

/// Errors raised below the gateway's own status codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("Failed to decode gateway response: {0}")]
    Decode(String),

    #[error("Gateway rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("Request timeout")]
    Timeout,
}

/// Reply to the init (auth) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthReply {
    pub code: i64,
    /// Session key, present when `code == 0`.
    pub session: Option<String>,
}

/// Reply to verify and release calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub code: i64,
    pub msg: String,
}

impl StatusReply {
    pub fn ok() -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Result of a send call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub code: i64,
    pub msg: String,
    /// Id the gateway assigned to the sent message, if reported.
    pub message_id: Option<i64>,
}

impl DeliveryReceipt {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Transport to the chat gateway.
///
/// `code == 0` means success on every reply; any other code is passed up
/// uninterpreted.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Exchange the auth key for a session key.
    async fn auth(&self, auth_key: &str) -> Result<AuthReply, TransportError>;

    /// Bind a session key to the bot account.
    async fn verify(
        &self,
        session_key: &SessionKey,
        bot_id: BotId,
    ) -> Result<StatusReply, TransportError>;

    /// Unbind and invalidate a session key.
    async fn release(
        &self,
        session_key: &SessionKey,
        bot_id: BotId,
    ) -> Result<StatusReply, TransportError>;

    /// Pop up to `count` pending inbound messages, oldest first.
    async fn fetch_messages(
        &self,
        session_key: &SessionKey,
        count: usize,
    ) -> Result<Vec<Message>, TransportError>;

    /// Deliver a friend or group message, quoted when `outbound.quote` is set.
    async fn send_message(
        &self,
        session_key: &SessionKey,
        outbound: &OutboundMessage,
    ) -> Result<DeliveryReceipt, TransportError>;
}
