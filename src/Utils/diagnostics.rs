//! Sink for non-fatal configuration anomalies (reference pressure mismatch,
//! discontinuous polynomials at the midpoint and so on).
//!
//! Managers never print on their own: they hand a one-line message to the
//! sink they were built with. [`LogSink`] forwards to the `log` facade, and
//! [`CollectingSink`] keeps the messages so a caller (or a test) can inspect them.
use log::warn;
use std::fmt::Debug;
use std::sync::Mutex;

pub trait DiagnosticSink: Send + Sync + Debug {
    fn emit_warning(&self, message: &str);
}

/// forwards every warning to `log::warn!`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit_warning(&self, message: &str) {
        warn!("{}", message);
    }
}

/// stores warnings in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn clear(&self) {
        if let Ok(mut m) = self.messages.lock() {
            m.clear();
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit_warning(&self, message: &str) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_collecting_sink() {
        let sink = Arc::new(CollectingSink::new());
        let as_dyn: Arc<dyn DiagnosticSink> = sink.clone();
        assert!(sink.is_empty());
        as_dyn.emit_warning("first");
        as_dyn.emit_warning("second");
        assert_eq!(sink.messages(), vec!["first".to_string(), "second".to_string()]);
        sink.clear();
        assert_eq!(sink.len(), 0);
        // LogSink must not panic without an installed logger
        LogSink.emit_warning("nobody listens");
    }
}
