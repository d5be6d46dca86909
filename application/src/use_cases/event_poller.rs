//! Event poller use case.
//!
//! A single repeating timer fetches pending messages and dispatches the ones
//! admitted by the listen scope to every registered listener.
//!
//! Ticks never overlap. The loop awaits each tick before waiting on the
//! timer again, missed timer ticks are skipped rather than bunched, and
//! every tick (timer-driven or [`poll_once`](SessionManager::poll_once))
//! holds the session's tick lock while it runs. A tick started from inside
//! a listener, while the enclosing tick still holds that lock, is skipped.

use crate::config::PollerParams;
use crate::ports::message_listener::MessageListener;
use crate::use_cases::session_manager::{SessionError, SessionInner, SessionManager};
use mirai_domain::ListenScope;
use std::sync::{Arc, RwLock, Weak};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

tokio::task_local! {
    static IN_TICK: ();
}

/// Outcome of one fetch-and-dispatch tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Messages returned by the gateway.
    pub fetched: usize,
    /// Messages handed to the listeners.
    pub dispatched: usize,
    /// Messages outside the listen scope.
    pub filtered: usize,
    /// Messages dropped because polling stopped mid-tick.
    pub dropped: usize,
    /// Fetch failure, if any. A failed tick dispatches nothing.
    pub error: Option<String>,
}

impl TickReport {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Listen scope and listener list read by every tick.
#[derive(Default)]
pub(crate) struct DispatchTable {
    scope: RwLock<ListenScope>,
    listeners: RwLock<Vec<Arc<dyn MessageListener>>>,
}

impl DispatchTable {
    pub(crate) fn scope(&self) -> ListenScope {
        *self.scope.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_scope(&self, scope: ListenScope) {
        *self.scope.write().unwrap_or_else(|e| e.into_inner()) = scope;
    }

    pub(crate) fn push(&self, listener: Arc<dyn MessageListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn MessageListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Timer state owned by one session.
#[derive(Default)]
pub(crate) struct PollerContext {
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl PollerContext {
    pub(crate) fn is_running(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| !c.is_cancelled())
    }

    pub(crate) fn token(&self) -> Option<CancellationToken> {
        self.cancel.clone()
    }

    /// Spawn the poll loop. The task holds only a weak reference, so it
    /// ends once every session handle is dropped.
    pub(crate) fn start(&mut self, session: Weak<SessionInner>, params: PollerParams) {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(session, params, cancel.clone()));
        self.cancel = Some(cancel);
        self.handle = Some(handle);
    }

    /// Cancel the loop without waiting for it. Returns whether it was running.
    pub(crate) fn stop(&mut self) -> bool {
        self.handle.take();
        match self.cancel.take() {
            Some(cancel) => {
                let was_running = !cancel.is_cancelled();
                cancel.cancel();
                was_running
            }
            None => false,
        }
    }
}

async fn run(session: Weak<SessionInner>, params: PollerParams, cancel: CancellationToken) {
    let period = params.effective_interval();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(inner) = session.upgrade() else {
            break;
        };
        let manager = SessionManager::from_inner(inner);
        let report = tick(&manager, &cancel).await;
        if report.fetched > 0 {
            debug!(
                fetched = report.fetched,
                dispatched = report.dispatched,
                filtered = report.filtered,
                dropped = report.dropped,
                "Poll tick"
            );
        }
    }

    debug!("Event poller stopped");
}

/// Fetch one batch and dispatch it.
///
/// Messages are dispatched in fetch order; listeners for one message run in
/// registration order. Dispatch stops early when `cancel` fires or the
/// session is no longer active. Called from within a running tick (a
/// listener polling again), it returns an empty report without fetching.
pub(crate) async fn tick(session: &SessionManager, cancel: &CancellationToken) -> TickReport {
    if IN_TICK.try_with(|_| ()).is_ok() {
        debug!("Nested poll inside a listener skipped");
        return TickReport::default();
    }
    IN_TICK.scope((), run_tick(session, cancel)).await
}

async fn run_tick(session: &SessionManager, cancel: &CancellationToken) -> TickReport {
    let inner = &session.inner;
    let _serial = inner.tick.lock().await;
    let mut report = TickReport::default();

    if cancel.is_cancelled() {
        return report;
    }

    let messages = match session.fetch_messages(inner.params.batch_size).await {
        Ok(messages) => messages,
        Err(SessionError::IllegalState(e)) => {
            trace!(error = %e, "Skipping tick");
            return report;
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch messages");
            report.error = Some(e.to_string());
            return report;
        }
    };

    report.fetched = messages.len();
    let listeners = inner.dispatch.snapshot();

    for (index, message) in messages.iter().enumerate() {
        if cancel.is_cancelled() || !session.is_active() {
            report.dropped = messages.len() - index;
            break;
        }

        if !inner.dispatch.scope().admits(message) {
            trace!(kind = message.kind_name(), "Message outside listen scope");
            report.filtered += 1;
            continue;
        }

        for listener in &listeners {
            listener.on_message(message, session).await;
        }
        report.dispatched += 1;
    }

    report
}
