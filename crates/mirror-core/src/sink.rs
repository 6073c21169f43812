//! Diagnostic sinks
//!
//! A sink is handed to each [`Synchronizer`](crate::Synchronizer) rather
//! than configured globally, so concurrent passes (tests included) keep
//! separate event streams.

use std::sync::Mutex;

use tracing::Level;

use crate::SyncEvent;

/// Observer receiving a pass's events.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &SyncEvent<'_>);
}

/// Forwards events to `tracing`.
///
/// Whatever subscriber the caller installed decides where lines end up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &SyncEvent<'_>) {
        match event {
            SyncEvent::Failed(error) => {
                tracing::error!(kind = ?error.kind(), detail = ?error, "{event}");
            }
            SyncEvent::Action { action, dry_run } => {
                tracing::info!(path = %action.path(), dry_run, "{event}");
            }
            _ if event.level() == Level::DEBUG => tracing::debug!("{event}"),
            _ => tracing::info!("{event}"),
        }
    }
}

/// A recorded event, rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub level: Level,
    pub message: String,
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    /// Messages of the events recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Messages at the given level.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedEvent>> {
        // A panic while holding the lock cannot leave the Vec inconsistent
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: &SyncEvent<'_>) {
        self.lock().push(RecordedEvent {
            level: event.level(),
            message: event.to_string(),
        });
    }
}
