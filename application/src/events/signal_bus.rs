//! Signal callback registry for `on_signal(signal, callback)`.
//!
//! Callbacks are keyed by [`Signal`] and run synchronously in registration
//! order. The bus does not catch panics raised by a callback.

use mirai_domain::Signal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A registered signal callback.
pub type SignalCallback = Arc<dyn Fn(Signal) + Send + Sync>;

/// Registry of lifecycle callbacks organized by signal.
#[derive(Default)]
pub struct SignalBus {
    /// signal → callbacks (in registration order)
    callbacks: RwLock<HashMap<Signal, Vec<SignalCallback>>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for the given signal.
    pub fn on<F>(&self, signal: Signal, callback: F)
    where
        F: Fn(Signal) + Send + Sync + 'static,
    {
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(signal)
            .or_default()
            .push(Arc::new(callback));
    }

    /// Number of callbacks registered for `signal`.
    pub fn listener_count(&self, signal: Signal) -> usize {
        self.callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&signal)
            .map_or(0, Vec::len)
    }

    /// Fire a signal, returning how many callbacks ran.
    ///
    /// The callback list is snapshotted first, so a callback may register
    /// further callbacks; those run from the next trigger on.
    pub fn trigger(&self, signal: Signal) -> usize {
        let callbacks: Vec<SignalCallback> = self
            .callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&signal)
            .cloned()
            .unwrap_or_default();

        for callback in &callbacks {
            callback(signal);
        }
        callbacks.len()
    }
}
