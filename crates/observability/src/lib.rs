//! Tracing setup and the outcome log injected into request handlers.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Severity-leveled log of request outcomes.
pub mod outcome;

pub use outcome::{LogEntry, MemoryOutcomeLog, OutcomeLog, Severity, TracingOutcomeLog};
pub use self::tracing::LogFormat;
