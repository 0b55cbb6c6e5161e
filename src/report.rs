//! The progress-reporting sink.
//!
//! The pipeline narrates every run through a single-method capability: a sink
//! that accepts one text line at a time. The log is linear and append-only;
//! ordering is significant. One implementation exists per host surface:
//! [`ConsoleSink`] for the console host and [`CaptureSink`] for tests and
//! embedding hosts that render the log themselves. The sink must not panic
//! back into the core - a panicking sink aborts the remainder of the run,
//! which is the host's responsibility to prevent.

use std::sync::{Arc, Mutex};

/// A sink for the pipeline's chronological, user-visible log.
pub trait ReportSink: Send + Sync {
    /// Accept one log line. Called many times per run, in order.
    fn line(&self, message: &str);
}

/// Console host surface: prints each line to stdout.
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn line(&self, message: &str) {
        println!("{message}");
    }
}

/// Capture surface: appends every line to a shared buffer.
///
/// Clones share the same buffer, so a host (or test) can keep one handle and
/// hand another to the pipeline.
#[derive(Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ReportSink for CaptureSink {
    fn line(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink_records_in_order() {
        let sink = CaptureSink::new();
        sink.line("first");
        sink.line("second");

        assert_eq!(sink.lines(), ["first", "second"]);
    }

    #[test]
    fn test_capture_sink_clones_share_the_buffer() {
        let sink = CaptureSink::new();
        let handle = sink.clone();
        sink.line("from the original");
        handle.line("from the clone");

        assert_eq!(sink.lines(), ["from the original", "from the clone"]);
    }
}
