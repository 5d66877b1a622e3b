//! Sink multiplexer
//!
//! One shared fan-out node: every record a logger emits is forwarded to
//! every sink held here, in insertion order. All loggers of a context share
//! the same multiplexer, so sink-level changes apply to all of them at once.

use super::{
    error::Result,
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::DispatchMetrics,
    pattern::PatternFormatter,
    sink::Sink,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct SinkMultiplexer {
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    metrics: Arc<DispatchMetrics>,
}

impl SinkMultiplexer {
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(DispatchMetrics::new()))
    }

    pub fn with_metrics(metrics: Arc<DispatchMetrics>) -> Self {
        Self {
            sinks: Mutex::new(Vec::new()),
            metrics,
        }
    }

    /// Pick the formatter for a sink joining the fan-out
    ///
    /// An explicit pattern wins; otherwise color sinks get the colorized
    /// default and everything else the plain one.
    fn apply_pattern(sink: &mut dyn Sink, pattern: Option<&str>) {
        let formatter = match pattern {
            Some(pattern) => PatternFormatter::new(pattern),
            None => PatternFormatter::default_for(sink.is_color()),
        };
        sink.set_formatter(formatter);
    }

    /// Format `sink` and append it after the current sinks
    pub fn add(&self, mut sink: Box<dyn Sink>, pattern: Option<&str>) {
        Self::apply_pattern(sink.as_mut(), pattern);
        self.sinks.lock().push(sink);
    }

    /// Format `sink` and make it the only sink
    ///
    /// The previous sinks are flushed and dropped after the swap, outside the lock.
    pub fn replace_all(&self, mut sink: Box<dyn Sink>, pattern: Option<&str>) {
        Self::apply_pattern(sink.as_mut(), pattern);
        let previous = std::mem::replace(&mut *self.sinks.lock(), vec![sink]);

        for mut old in previous {
            if let Err(e) = old.flush() {
                eprintln!("[UNLOG ERROR] Sink '{}' flush failed on replace: {}", old.name(), e);
            }
        }
    }

    /// Set the minimum level of every sink currently held
    pub fn broadcast_level(&self, level: LogLevel) {
        for sink in self.sinks.lock().iter_mut() {
            sink.set_level(level);
        }
    }

    /// Flush every sink, returning the first error after all were attempted
    pub fn flush_all(&self) -> Result<()> {
        let mut first_error = None;

        for sink in self.sinks.lock().iter_mut() {
            if let Err(e) = sink.flush() {
                eprintln!("[UNLOG ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Forward `record` to every sink whose level admits it
    ///
    /// **Per-sink fault isolation**: a sink that errors or panics is reported
    /// on stderr and counted; the remaining sinks still receive the record.
    pub fn log(&self, record: &LogRecord) {
        let mut sinks = self.sinks.lock();
        Self::fan_out(&mut sinks, record, &self.metrics);
    }

    fn fan_out(sinks: &mut [Box<dyn Sink>], record: &LogRecord, metrics: &DispatchMetrics) {
        metrics.record_dispatched();

        for (idx, sink) in sinks.iter_mut().enumerate() {
            if !sink.should_log(record.level) {
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.log(record)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[UNLOG ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                    metrics.record_write_failure();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[UNLOG CRITICAL] Sink #{} panicked: {}. \
                         Other sinks continue to function.",
                        idx, panic_msg
                    );
                    metrics.record_write_failure();
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    /// Sink names in fan-out order
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.lock().iter().map(|s| s.name().to_string()).collect()
    }

    /// Levels of the held sinks in fan-out order
    pub fn sink_levels(&self) -> Vec<LogLevel> {
        self.sinks.lock().iter().map(|s| s.level()).collect()
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }
}

impl Default for SinkMultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use crate::sinks::{CaptureBuffer, CaptureSink, ConsoleSink};

    fn record(level: LogLevel, message: &str) -> LogRecord {
        LogRecord::new(level, Arc::from("mux"), message.to_string())
    }

    struct FailingSink {
        panic: bool,
    }

    impl Sink for FailingSink {
        fn log(&mut self, _record: &LogRecord) -> Result<()> {
            if self.panic {
                panic!("sink exploded");
            }
            Err(LoggerError::file_sink("nowhere", "disk full"))
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::file_sink("nowhere", "flush failed"))
        }

        fn level(&self) -> LogLevel {
            LogLevel::Trace
        }

        fn set_level(&mut self, _level: LogLevel) {}

        fn set_formatter(&mut self, _formatter: PatternFormatter) {}

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_fan_out_in_insertion_order() {
        let mux = SinkMultiplexer::new();
        let buffer = CaptureBuffer::new();
        mux.add(Box::new(CaptureSink::with_buffer(buffer.clone())), Some("first %v"));
        mux.add(Box::new(CaptureSink::with_buffer(buffer.clone())), Some("second %v"));

        mux.log(&record(LogLevel::Info, "m"));

        assert_eq!(buffer.lines(), vec!["first m", "second m"]);
        assert_eq!(mux.len(), 2);
        assert_eq!(mux.metrics().dispatched_count(), 1);
    }

    #[test]
    fn test_default_pattern_selection() {
        let mux = SinkMultiplexer::new();
        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        mux.add(Box::new(sink), None);

        mux.log(&record(LogLevel::Info, "plain"));
        assert!(buffer.contains("[mux:info|:0] >> plain"), "{}", buffer.contents());
    }

    #[test]
    fn test_replace_all_keeps_single_sink() {
        let mux = SinkMultiplexer::new();
        let old = CaptureSink::new();
        let old_buffer = old.buffer();
        mux.add(Box::new(old), None);
        mux.add(Box::new(ConsoleSink::stdout()), None);

        let new = CaptureSink::new();
        let new_buffer = new.buffer();
        mux.replace_all(Box::new(new), Some("%v"));

        mux.log(&record(LogLevel::Info, "after"));
        assert_eq!(mux.sink_names(), vec!["capture"]);
        assert!(old_buffer.is_empty());
        assert_eq!(new_buffer.contents(), "after\n");
    }

    #[test]
    fn test_broadcast_level() {
        let mux = SinkMultiplexer::new();
        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        mux.add(Box::new(sink), Some("%v"));
        mux.add(Box::new(CaptureSink::new()), None);

        mux.broadcast_level(LogLevel::Warn);
        assert_eq!(mux.sink_levels(), vec![LogLevel::Warn, LogLevel::Warn]);

        mux.log(&record(LogLevel::Info, "dropped"));
        mux.log(&record(LogLevel::Error, "kept"));
        assert_eq!(buffer.lines(), vec!["kept"]);
    }

    #[test]
    fn test_failing_sinks_are_isolated() {
        let mux = SinkMultiplexer::new();
        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        mux.add(Box::new(FailingSink { panic: false }), None);
        mux.add(Box::new(FailingSink { panic: true }), None);
        mux.add(Box::new(sink), Some("%v"));

        mux.log(&record(LogLevel::Info, "survives"));

        assert_eq!(buffer.lines(), vec!["survives"]);
        assert_eq!(mux.metrics().write_failures(), 2);
        assert!(mux.flush_all().is_err());
    }

    #[test]
    fn test_empty_multiplexer() {
        let mux = SinkMultiplexer::default();
        assert!(mux.is_empty());
        mux.log(&record(LogLevel::Info, "nobody listens"));
        assert!(mux.flush_all().is_ok());
    }
}
