//! Outcome log: one entry per request attempt and per terminal outcome.
//!
//! Handlers receive an `Arc<dyn OutcomeLog>` at construction instead of
//! reaching for a global logger. Logging is infallible from the caller's point
//! of view: implementations absorb their own failures so a broken sink can
//! never fail a request.

use std::sync::Mutex;

/// Severity of an outcome entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Normal lifecycle events.
    Info,
    /// Client-caused rejections (bad input, not found).
    Warn,
    /// Unexpected faults and failed store operations.
    Error,
}

/// Severity-leveled sink for free-form outcome messages.
pub trait OutcomeLog: Send + Sync {
    fn log(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Severity::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }
}

/// Forwards entries to `tracing`, tagged with the resource they belong to.
#[derive(Debug, Clone)]
pub struct TracingOutcomeLog {
    resource: &'static str,
}

impl TracingOutcomeLog {
    pub fn new(resource: &'static str) -> Self {
        Self { resource }
    }
}

impl OutcomeLog for TracingOutcomeLog {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => ::tracing::info!(resource = self.resource, "{message}"),
            Severity::Warn => ::tracing::warn!(resource = self.resource, "{message}"),
            Severity::Error => ::tracing::error!(resource = self.resource, "{message}"),
        }
    }
}

/// A single recorded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
}

/// Append-only in-memory log (tests/dev).
#[derive(Debug, Default)]
pub struct MemoryOutcomeLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryOutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries().pop()
    }
}

impl OutcomeLog for MemoryOutcomeLog {
    fn log(&self, severity: Severity, message: &str) {
        // A poisoned lock still holds a usable vec; keep appending.
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(LogEntry {
            severity,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_appends_in_order() {
        let log = MemoryOutcomeLog::new();
        log.info("attempted");
        log.warn("not found");
        log.error("boom");

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].severity, Severity::Info);
        assert_eq!(entries[1].message, "not found");
        assert_eq!(log.last().unwrap().severity, Severity::Error);
    }

    #[test]
    fn count_filters_by_severity() {
        let log = MemoryOutcomeLog::new();
        log.warn("a");
        log.warn("b");
        log.info("c");

        assert_eq!(log.count(Severity::Warn), 2);
        assert_eq!(log.count(Severity::Info), 1);
        assert_eq!(log.count(Severity::Error), 0);
    }

    #[test]
    fn tracing_log_never_panics_without_subscriber() {
        let log = TracingOutcomeLog::new("authors");
        log.info("info");
        log.warn("warn");
        log.error("error");
    }
}
