//! Event payload types.

/// Payload for `on_scan_started`.
#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub total_files: usize,
    pub gate_count: usize,
}

/// Payload for `on_gate_skipped` (gate not applicable).
#[derive(Debug, Clone)]
pub struct GateSkippedEvent {
    pub gate_id: String,
    pub reason: String,
}

/// Payload for `on_pattern_rejected` (regex failed to compile).
#[derive(Debug, Clone)]
pub struct PatternRejectedEvent {
    pub gate_id: String,
    pub pattern: String,
    pub message: String,
}

/// Payload for `on_gate_evaluated`.
#[derive(Debug, Clone)]
pub struct GateEvaluatedEvent {
    pub gate_id: String,
    pub status: String,
    pub score: f64,
    pub match_count: usize,
    pub duration_ms: u64,
}

/// Payload for `on_scan_complete`.
#[derive(Debug, Clone)]
pub struct ScanCompleteEvent {
    pub applicable_gates: usize,
    pub not_applicable_gates: usize,
    pub overall_score: f64,
    pub duration_ms: u64,
}
