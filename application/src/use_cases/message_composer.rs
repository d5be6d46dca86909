//! Message composer use case.
//!
//! Builds outbound messages and hands them to the gateway transport. The
//! quote-aware path ([`MessageComposer::send_quoted_message`]) degrades to a
//! plain send when the inbound message has nothing quotable; callers see the
//! same delivery result either way.

use crate::ports::gateway_transport::{DeliveryReceipt, GatewayTransport, TransportError};
use mirai_domain::{
    DomainError, Message, MessageChain, OutboundMessage, QuoteId, SendTarget, SessionOperation,
    SessionState,
};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while sending a message.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Cannot send to a {kind} event: only friend and group messages are valid targets")]
    InvalidTarget { kind: String },

    #[error("{0}")]
    IllegalState(#[from] DomainError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Gateway rejected message (code {code}): {message}")]
    Rejected { code: i64, message: String },
}

/// Composes and sends outbound messages for one session.
///
/// Cheap to clone; every clone reads the session key of the same session.
#[derive(Clone)]
pub struct MessageComposer {
    transport: Arc<dyn GatewayTransport>,
    state: Arc<RwLock<SessionState>>,
}

impl MessageComposer {
    pub(crate) fn new(
        transport: Arc<dyn GatewayTransport>,
        state: Arc<RwLock<SessionState>>,
    ) -> Self {
        Self { transport, state }
    }

    /// Send `chain` back to where `target` came from.
    ///
    /// Friend messages are answered to the sender, group messages to the
    /// group. Any other event kind fails with
    /// [`ComposeError::InvalidTarget`].
    pub async fn send_message(
        &self,
        chain: MessageChain,
        target: &Message,
    ) -> Result<DeliveryReceipt, ComposeError> {
        let target = Self::resolve_target(target)?;
        self.send(OutboundMessage::new(target, chain)).await
    }

    /// Send `chain` as a quote-reply to `target`.
    ///
    /// Quoting needs `target`'s first chain component to be a `Source` with
    /// a non-negative uid. Without one this falls back to
    /// [`send_message`](Self::send_message) with the same arguments.
    pub async fn send_quoted_message(
        &self,
        chain: MessageChain,
        target: &Message,
    ) -> Result<DeliveryReceipt, ComposeError> {
        match target.quote_id() {
            Some(quote) => {
                let target = Self::resolve_target(target)?;
                self.send(OutboundMessage::new(target, chain).quoting(quote))
                    .await
            }
            None => {
                debug!(
                    kind = %target.kind_name(),
                    "No quotable source, sending without quote"
                );
                self.send_message(chain, target).await
            }
        }
    }

    /// Reply with a single plain-text component.
    pub async fn reply(
        &self,
        text: impl Into<String>,
        target: &Message,
    ) -> Result<DeliveryReceipt, ComposeError> {
        self.send_message(MessageChain::plain(text), target).await
    }

    /// Quote-reply with a single plain-text component.
    pub async fn quote_reply(
        &self,
        text: impl Into<String>,
        target: &Message,
    ) -> Result<DeliveryReceipt, ComposeError> {
        self.send_quoted_message(MessageChain::plain(text), target)
            .await
    }

    pub async fn send_friend_message(
        &self,
        chain: MessageChain,
        friend_id: i64,
    ) -> Result<DeliveryReceipt, ComposeError> {
        self.send(OutboundMessage::new(SendTarget::Friend(friend_id), chain))
            .await
    }

    pub async fn send_group_message(
        &self,
        chain: MessageChain,
        group_id: i64,
    ) -> Result<DeliveryReceipt, ComposeError> {
        self.send(OutboundMessage::new(SendTarget::Group(group_id), chain))
            .await
    }

    pub async fn send_quoted_friend_message(
        &self,
        chain: MessageChain,
        friend_id: i64,
        quote: QuoteId,
    ) -> Result<DeliveryReceipt, ComposeError> {
        self.send(OutboundMessage::new(SendTarget::Friend(friend_id), chain).quoting(quote))
            .await
    }

    pub async fn send_quoted_group_message(
        &self,
        chain: MessageChain,
        group_id: i64,
        quote: QuoteId,
    ) -> Result<DeliveryReceipt, ComposeError> {
        self.send(OutboundMessage::new(SendTarget::Group(group_id), chain).quoting(quote))
            .await
    }

    /// Deliver a resolved outbound message.
    ///
    /// A non-zero gateway code is returned as [`ComposeError::Rejected`].
    pub async fn send(&self, outbound: OutboundMessage) -> Result<DeliveryReceipt, ComposeError> {
        let key = self
            .state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .key_for(SessionOperation::Send)?
            .clone();

        debug!(
            to = %outbound.target,
            components = outbound.chain.len(),
            quote = ?outbound.quote.map(|q| q.value()),
            "Sending message"
        );

        let receipt = self.transport.send_message(&key, &outbound).await?;
        if !receipt.is_success() {
            return Err(ComposeError::Rejected {
                code: receipt.code,
                message: receipt.msg,
            });
        }
        Ok(receipt)
    }

    fn resolve_target(target: &Message) -> Result<SendTarget, ComposeError> {
        SendTarget::from_message(target).ok_or_else(|| ComposeError::InvalidTarget {
            kind: target.kind_name().to_string(),
        })
    }
}
