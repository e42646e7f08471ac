//! EventDispatcher: synchronous event dispatch, zero overhead when empty.

use std::sync::Arc;

use super::handler::GateEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn GateEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn GateEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and does not stop later handlers.
    fn emit<F: Fn(&dyn GateEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                ::tracing::warn!("gate event handler panicked; continuing");
            }
        }
    }

    pub fn emit_scan_started(&self, event: &ScanStartedEvent) {
        self.emit(|h| h.on_scan_started(event));
    }

    pub fn emit_gate_skipped(&self, event: &GateSkippedEvent) {
        self.emit(|h| h.on_gate_skipped(event));
    }

    pub fn emit_pattern_rejected(&self, event: &PatternRejectedEvent) {
        self.emit(|h| h.on_pattern_rejected(event));
    }

    pub fn emit_gate_evaluated(&self, event: &GateEvaluatedEvent) {
        self.emit(|h| h.on_gate_evaluated(event));
    }

    pub fn emit_scan_complete(&self, event: &ScanCompleteEvent) {
        self.emit(|h| h.on_scan_complete(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
