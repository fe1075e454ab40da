use std::collections::VecDeque;

/// Most recent entries retained by the diagnostic ring.
pub const LOG_CAPACITY: usize = 50;

/// One diagnostic entry. `kind` mirrors the wire `type` discriminator,
/// with `"error"` for locally detected failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: &'static str,
    pub message: String,
}

/// Bounded diagnostic ring, newest-first.
///
/// This is user-facing scrollback, not simulation state and not a
/// tracing backend: every inbound message lands one entry here so the
/// stream stays inspectable from the UI.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: VecDeque<LogEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: &'static str, message: impl Into<String>) {
        self.entries.push_front(LogEntry {
            kind,
            message: message.into(),
        });
        self.entries.truncate(LOG_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagnosticLog, LOG_CAPACITY};

    #[test]
    fn newest_entry_comes_first() {
        let mut log = DiagnosticLog::new();
        log.push("info", "first");
        log.push("update", "second");
        assert_eq!(log.newest().unwrap().message, "second");
        let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["update", "info"]);
    }

    #[test]
    fn ring_is_capped_at_capacity() {
        let mut log = DiagnosticLog::new();
        for i in 0..(LOG_CAPACITY + 20) {
            log.push("update", format!("tick {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        // Oldest entries fell off; the newest survives.
        assert_eq!(log.newest().unwrap().message, format!("tick {}", LOG_CAPACITY + 19));
    }
}
