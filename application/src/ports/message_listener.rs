//! Message listener port
//!
//! Embedding applications register listeners to receive inbound messages.

use crate::use_cases::session_manager::SessionManager;
use async_trait::async_trait;
use mirai_domain::Message;
use std::future::Future;

/// Callback invoked once per dispatched message.
///
/// Listeners run sequentially in registration order. The session handle can
/// be used to reply (via [`SessionManager::composer`]) or to end the session.
#[async_trait]
pub trait MessageListener: Send + Sync {
    async fn on_message(&self, message: &Message, session: &SessionManager);
}

/// Adapts an async closure into a [`MessageListener`].
///
/// The closure receives owned copies of the message and session handle.
pub struct FnListener<F>(F);

impl<F> FnListener<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> MessageListener for FnListener<F>
where
    F: Fn(Message, SessionManager) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_message(&self, message: &Message, session: &SessionManager) {
        (self.0)(message.clone(), session.clone()).await
    }
}
