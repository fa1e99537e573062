//! Audit Sink Implementations

use crate::domain::audit::{AuditEvent, AuditSink};

/// Audit sink that writes events to the tracing pipeline
///
/// Events go out on a dedicated target so log routing can pick them up
/// separately from application logs.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            event = event.kind.as_str(),
            outcome = event.outcome.as_str(),
            user_id = %event.user_id,
            "Audit event"
        );
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;

    use crate::domain::audit::{AuditEvent, AuditEventKind, AuditSink};

    /// Audit sink that records events for assertions
    #[derive(Default)]
    pub struct RecordingAuditSink {
        events: Mutex<Vec<AuditEvent>>,
    }

    impl RecordingAuditSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn kinds(&self) -> Vec<AuditEventKind> {
            self.events.lock().unwrap().iter().map(|e| e.kind).collect()
        }

        pub fn events(&self) -> Vec<AuditEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl AuditSink for RecordingAuditSink {
        fn emit(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
