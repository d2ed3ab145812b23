//! Alert listener trait and stock implementations.
//!
//! Listeners are notified synchronously, in registration order, with
//! per-call failure isolation: one listener failing never blocks or drops
//! delivery to the rest. A listener that keeps failing is dropped from the
//! registry once it exhausts its failure budget, so a permanently
//! unreachable sink cannot be retried forever.

use crate::domain::Alert;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Consecutive failures after which a listener is dropped.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Failure reported by a listener during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

/// Receives dispatched alerts.
pub trait AlertListener: Send + Sync {
    /// Human-readable name, used in dispatch logs.
    fn name(&self) -> &str;

    fn notify(&self, alert: &Alert) -> Result<(), ListenerError>;
}

/// A registered listener plus its consecutive-failure count.
pub(crate) struct RegisteredListener {
    pub(crate) listener: Arc<dyn AlertListener>,
    failures: AtomicU32,
}

impl RegisteredListener {
    pub(crate) fn new(listener: Arc<dyn AlertListener>) -> Self {
        Self {
            listener,
            failures: AtomicU32::new(0),
        }
    }

    /// Record a delivery outcome; returns true once the failure budget is
    /// exhausted and the listener should be dropped.
    pub(crate) fn record_outcome(&self, outcome: &Result<(), ListenerError>) -> bool {
        match outcome {
            Ok(()) => {
                self.failures.store(0, Ordering::Relaxed);
                false
            }
            Err(_) => self.failures.fetch_add(1, Ordering::Relaxed) + 1 >= MAX_CONSECUTIVE_FAILURES,
        }
    }
}

/// Logs every alert through `tracing`. The default sink when the hosting
/// layer has nothing else wired up yet.
#[derive(Debug, Default)]
pub struct LogListener;

impl AlertListener for LogListener {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&self, alert: &Alert) -> Result<(), ListenerError> {
        tracing::info!(
            kind = alert.kind.as_str(),
            symbol = %alert.symbol,
            severity = ?alert.severity,
            "{}",
            alert.message
        );
        Ok(())
    }
}

/// Buffers alerts for later inspection. Used by tests and diagnostics.
#[derive(Debug, Default)]
pub struct CollectingListener {
    alerts: Mutex<Vec<Alert>>,
}

impl CollectingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.lock().is_empty()
    }
}

impl AlertListener for CollectingListener {
    fn name(&self) -> &str {
        "collecting"
    }

    fn notify(&self, alert: &Alert) -> Result<(), ListenerError> {
        self.alerts.lock().push(alert.clone());
        Ok(())
    }
}
