//! Session manager use case.
//!
//! Owns the session state machine and drives it through the gateway:
//!
//! 1. [`authenticate`](SessionManager::authenticate) exchanges the auth key
//!    for a session key, emits [`Signal::Authed`] and starts the poller
//! 2. [`verify`](SessionManager::verify) binds the key to the bot account
//!    and emits [`Signal::Verified`]
//! 3. [`release`](SessionManager::release) stops the poller, invalidates
//!    the key and emits [`Signal::Released`]
//!
//! Startup failures (auth, connection, verify) move the session to `Failed`
//! and are reported as fatal errors. A failed release is reported but leaves
//! the session open.

use crate::config::PollerParams;
use crate::events::signal_bus::SignalBus;
use crate::ports::gateway_transport::{GatewayTransport, TransportError};
use crate::ports::message_listener::{FnListener, MessageListener};
use crate::use_cases::event_poller::{self, DispatchTable, PollerContext, TickReport};
use crate::use_cases::message_composer::MessageComposer;
use mirai_domain::{
    DomainError, ListenScope, Message, SessionConfig, SessionKey, SessionOperation, SessionPhase,
    SessionState, Signal,
};
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors raised by session lifecycle operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid auth key: gateway returned code {code}")]
    Auth { code: i64 },

    #[error("Gateway accepted the auth key but issued no session key")]
    MissingSessionKey,

    #[error("Cannot reach gateway: {0}")]
    Connection(TransportError),

    #[error("Invalid session key: verify returned code {code}: {message}")]
    Verify { code: i64, message: String },

    #[error("Invalid session key: release returned code {code}")]
    Release { code: i64 },

    #[error("Transport error: {0}")]
    Transport(TransportError),

    #[error("{0}")]
    IllegalState(#[from] DomainError),
}

impl SessionError {
    /// Whether the session is unusable after this error.
    ///
    /// Failures while establishing the session are fatal; failures while
    /// releasing it or fetching messages are not.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Auth { .. }
                | SessionError::MissingSessionKey
                | SessionError::Connection(_)
                | SessionError::Verify { .. }
        )
    }
}

/// Shared state behind every [`SessionManager`] clone.
pub(crate) struct SessionInner {
    config: SessionConfig,
    transport: Arc<dyn GatewayTransport>,
    state: Arc<RwLock<SessionState>>,
    signals: SignalBus,
    pub(crate) dispatch: DispatchTable,
    pub(crate) params: PollerParams,
    poller: Mutex<PollerContext>,
    /// Serializes authenticate/verify/release.
    lifecycle: tokio::sync::Mutex<()>,
    /// Serializes poll ticks, whatever triggered them.
    pub(crate) tick: tokio::sync::Mutex<()>,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.poller
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .stop();
    }
}

/// Client session against one gateway.
///
/// Cheap to clone; all clones drive the same session. Listeners receive a
/// clone as their context.
#[derive(Clone)]
pub struct SessionManager {
    pub(crate) inner: Arc<SessionInner>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, transport: Arc<dyn GatewayTransport>) -> Self {
        Self::with_params(config, transport, PollerParams::default())
    }

    pub fn with_params(
        config: SessionConfig,
        transport: Arc<dyn GatewayTransport>,
        params: PollerParams,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                transport,
                state: Arc::new(RwLock::new(SessionState::Pending)),
                signals: SignalBus::new(),
                dispatch: DispatchTable::default(),
                params,
                poller: Mutex::new(PollerContext::default()),
                lifecycle: tokio::sync::Mutex::new(()),
                tick: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<SessionInner>) -> Self {
        Self { inner }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn poller_params(&self) -> &PollerParams {
        &self.inner.params
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.read_state().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.read_state().phase()
    }

    /// Session key, present only after authentication succeeded and until
    /// the session is released or fails.
    pub fn session_key(&self) -> Option<SessionKey> {
        self.read_state().session_key().cloned()
    }

    pub fn is_active(&self) -> bool {
        self.read_state().is_active()
    }

    /// Composer sharing this session's credential.
    pub fn composer(&self) -> MessageComposer {
        MessageComposer::new(
            Arc::clone(&self.inner.transport),
            Arc::clone(&self.inner.state),
        )
    }

    // ==================== Registration ====================

    /// Replace the listen scope.
    pub fn listen(&self, scope: ListenScope) {
        info!(scope = %scope, "Listen scope set");
        self.inner.dispatch.set_scope(scope);
    }

    pub fn listen_scope(&self) -> ListenScope {
        self.inner.dispatch.scope()
    }

    /// Register a lifecycle callback.
    pub fn on_signal<F>(&self, signal: Signal, callback: F)
    where
        F: Fn(Signal) + Send + Sync + 'static,
    {
        self.inner.signals.on(signal, callback);
    }

    /// Register a message listener. Listeners are never removed.
    pub fn on_message<L>(&self, listener: L)
    where
        L: MessageListener + 'static,
    {
        self.inner.dispatch.push(Arc::new(listener));
    }

    /// Register an async closure as a message listener.
    pub fn on_message_fn<F, Fut>(&self, f: F)
    where
        F: Fn(Message, SessionManager) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_message(FnListener::new(f));
    }

    pub fn listener_count(&self) -> usize {
        self.inner.dispatch.len()
    }

    // ==================== Lifecycle ====================

    /// Obtain a session key and start polling.
    ///
    /// Valid only while `Pending`. On a non-zero code or an unreachable
    /// gateway the session moves to `Failed`.
    pub async fn authenticate(&self) -> Result<SessionKey, SessionError> {
        let _lifecycle = self.inner.lifecycle.lock().await;
        self.read_state().ensure(SessionOperation::Authenticate)?;

        info!(port = self.inner.config.port, "Authenticating with gateway");

        let reply = match self.inner.transport.auth(&self.inner.config.auth_key).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Gateway unreachable during authentication");
                self.fail();
                return Err(SessionError::Connection(e));
            }
        };

        if reply.code != 0 {
            error!(code = reply.code, "Invalid auth key");
            self.fail();
            return Err(SessionError::Auth { code: reply.code });
        }

        let key = match reply.session.filter(|s| !s.is_empty()) {
            Some(session) => SessionKey::new(session),
            None => {
                error!("Gateway issued an empty session key");
                self.fail();
                return Err(SessionError::MissingSessionKey);
            }
        };

        self.set_state(SessionState::Authenticated { key: key.clone() });
        info!("Session authenticated");

        self.inner.signals.trigger(Signal::Authed);
        self.start_polling();
        Ok(key)
    }

    /// Bind the session key to the configured bot account.
    ///
    /// Valid only while `Authenticated`. Any failure moves the session to
    /// `Failed` and stops polling.
    pub async fn verify(&self) -> Result<(), SessionError> {
        let _lifecycle = self.inner.lifecycle.lock().await;
        let key = self.read_state().key_for(SessionOperation::Verify)?.clone();
        let bot_id = self.inner.config.bot_id;

        let reply = match self.inner.transport.verify(&key, bot_id).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Gateway unreachable during verification");
                self.fail();
                return Err(SessionError::Connection(e));
            }
        };

        if !reply.is_success() {
            error!(code = reply.code, msg = %reply.msg, "Invalid session key");
            self.fail();
            return Err(SessionError::Verify {
                code: reply.code,
                message: reply.msg,
            });
        }

        self.set_state(SessionState::Verified { key });
        info!(bot_id, "Session verified");

        self.inner.signals.trigger(Signal::Verified);
        Ok(())
    }

    /// Stop polling and invalidate the session key.
    ///
    /// A failed release is logged and returned but is not fatal: the session
    /// stays open and keeps polling.
    pub async fn release(&self) -> Result<(), SessionError> {
        let _lifecycle = self.inner.lifecycle.lock().await;
        let key = self.read_state().key_for(SessionOperation::Release)?.clone();
        let bot_id = self.inner.config.bot_id;

        let reply = match self.inner.transport.release(&key, bot_id).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Failed to release session");
                return Err(SessionError::Transport(e));
            }
        };

        if !reply.is_success() {
            warn!(code = reply.code, "Invalid session key");
            return Err(SessionError::Release { code: reply.code });
        }

        self.stop_polling();
        self.set_state(SessionState::Released);
        info!(bot_id, "Session released");

        self.inner.signals.trigger(Signal::Released);
        Ok(())
    }

    /// Fetch up to `count` pending messages directly.
    pub async fn fetch_messages(&self, count: usize) -> Result<Vec<Message>, SessionError> {
        let key = self.read_state().key_for(SessionOperation::Fetch)?.clone();
        self.inner
            .transport
            .fetch_messages(&key, count)
            .await
            .map_err(SessionError::Transport)
    }

    // ==================== Polling ====================

    /// Run one fetch-and-dispatch tick now.
    ///
    /// Serialized with timer ticks. Called from inside a listener, it
    /// returns an empty report without fetching, since the enclosing tick
    /// is still dispatching.
    pub async fn poll_once(&self) -> TickReport {
        let cancel = self.current_poller_token().unwrap_or_default();
        event_poller::tick(self, &cancel).await
    }

    pub fn is_polling(&self) -> bool {
        self.lock_poller().is_running()
    }

    /// Stop the poll timer.
    ///
    /// Only signals cancellation and never waits for the poll task, so it
    /// can be called from inside a listener. Messages of the current tick
    /// that were not yet dispatched are dropped.
    pub fn stop_polling(&self) {
        if self.lock_poller().stop() {
            debug!("Event poller stopping");
        }
    }

    fn start_polling(&self) {
        let mut poller = self.lock_poller();
        if poller.is_running() {
            return;
        }
        poller.start(Arc::downgrade(&self.inner), self.inner.params.clone());
        debug!(
            interval_ms = self.inner.params.interval.as_millis() as u64,
            batch_size = self.inner.params.batch_size,
            "Event poller started"
        );
    }

    fn current_poller_token(&self) -> Option<CancellationToken> {
        self.lock_poller().token()
    }

    // ==================== State helpers ====================

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SessionState) {
        *self.inner.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn fail(&self) {
        self.stop_polling();
        self.set_state(SessionState::Failed);
    }

    fn lock_poller(&self) -> std::sync::MutexGuard<'_, PollerContext> {
        self.inner.poller.lock().unwrap_or_else(|e| e.into_inner())
    }
}
