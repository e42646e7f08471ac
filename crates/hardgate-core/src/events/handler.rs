//! GateEventHandler trait with no-op defaults.

use super::types::*;

/// Receives gate lifecycle events. Every method defaults to a no-op so
/// handlers implement only what they need.
pub trait GateEventHandler: Send + Sync {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_gate_skipped(&self, _event: &GateSkippedEvent) {}
    fn on_pattern_rejected(&self, _event: &PatternRejectedEvent) {}
    fn on_gate_evaluated(&self, _event: &GateEvaluatedEvent) {}
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {}
}
