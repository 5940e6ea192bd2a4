//! Recording audit sink for tests.

use std::sync::Mutex;

use atrium_core::audit::{AuditEvent, AuditSink};

/// Audit sink that records every event for later assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event, in order.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns true if any recorded event satisfies the predicate.
    pub fn contains(&self, predicate: impl Fn(&AuditEvent) -> bool) -> bool {
        self.events().iter().any(|event| predicate(event))
    }
}

impl AuditSink for MemorySink {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
