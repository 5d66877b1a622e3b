//! In-memory capture sink
//!
//! Keeps rendered lines in a shared buffer. Useful for asserting on output
//! in tests and for embedding log output in other views.

use crate::core::{LogLevel, LogRecord, PatternFormatter, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to the text captured by a [`CaptureSink`]
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<String>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.inner.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines().map(String::from).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.inner.lock().contains(text)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    fn push_line(&self, line: &str) {
        let mut buffer = self.inner.lock();
        buffer.push_str(line);
        buffer.push('\n');
    }
}

/// Sink writing into a [`CaptureBuffer`]
///
/// # Example
///
/// ```
/// use unlog::sinks::CaptureSink;
///
/// let sink = CaptureSink::new();
/// let buffer = sink.buffer();
/// assert!(buffer.is_empty());
/// ```
pub struct CaptureSink {
    buffer: CaptureBuffer,
    level: LogLevel,
    formatter: PatternFormatter,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::with_buffer(CaptureBuffer::new())
    }

    pub fn with_buffer(buffer: CaptureBuffer) -> Self {
        Self {
            buffer,
            level: LogLevel::Trace,
            formatter: PatternFormatter::default(),
        }
    }

    /// Handle to the captured text; stays valid after the sink is moved into a multiplexer
    pub fn buffer(&self) -> CaptureBuffer {
        self.buffer.clone()
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for CaptureSink {
    fn log(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format(record);
        self.buffer.push_line(&line.text);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn set_formatter(&mut self, formatter: PatternFormatter) {
        self.formatter = formatter;
    }

    fn name(&self) -> &str {
        "capture"
    }
}
