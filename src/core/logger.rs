//! Logger handle

use super::{
    dispatch_pool::DispatchPool,
    error::Result,
    log_level::LogLevel,
    log_record::{LogRecord, SourceLocation},
    multiplexer::SinkMultiplexer,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

struct LoggerInner {
    name: Arc<str>,
    level: RwLock<LogLevel>,
    sinks: Arc<SinkMultiplexer>,
    pool: Option<Arc<DispatchPool>>,
}

/// A named logger
///
/// Cheap to clone: clones share the same level and output. A logger never
/// owns sinks itself; it emits through the multiplexer of the
/// [`LoggingContext`](crate::core::LoggingContext) that built it, either
/// directly or through an async [`DispatchPool`].
///
/// # Example
///
/// ```
/// use unlog::prelude::*;
///
/// let ctx = LoggingContext::new();
/// let sink = CaptureSink::new();
/// let buffer = sink.buffer();
/// ctx.add_sink_with_pattern(Box::new(sink), "%n:%l %v");
///
/// let logger = ctx.logger("net");
/// logger.info("listening");
/// assert_eq!(buffer.contents(), "net:info listening\n");
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub(crate) fn new(
        name: &str,
        level: LogLevel,
        sinks: Arc<SinkMultiplexer>,
        pool: Option<Arc<DispatchPool>>,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: Arc::from(name),
                level: RwLock::new(level),
                sinks,
                pool,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn level(&self) -> LogLevel {
        *self.inner.level.read()
    }

    /// Change this logger's threshold only; sinks and other loggers are untouched
    pub fn set_level(&self, level: LogLevel) {
        *self.inner.level.write() = level;
    }

    #[inline]
    pub fn should_log(&self, level: LogLevel) -> bool {
        level.passes(*self.inner.level.read())
    }

    pub fn is_async(&self) -> bool {
        self.inner.pool.is_some()
    }

    /// Emit a preformatted message, as the logging macros do
    pub fn log(&self, level: LogLevel, location: Option<SourceLocation>, args: fmt::Arguments<'_>) {
        if !self.should_log(level) {
            return;
        }

        // Plain literals skip the formatting machinery
        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        self.emit(level, location, message);
    }

    /// Emit a message without source location
    pub fn log_str(&self, level: LogLevel, message: impl Into<String>) {
        if !self.should_log(level) {
            return;
        }
        self.emit(level, None, message.into());
    }

    fn emit(&self, level: LogLevel, location: Option<SourceLocation>, message: String) {
        let mut record = LogRecord::new(level, Arc::clone(&self.inner.name), message);
        record.location = location;

        match &self.inner.pool {
            Some(pool) => pool.submit(record),
            None => self.inner.sinks.log(&record),
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log_str(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_str(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log_str(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log_str(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log_str(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log_str(LogLevel::Critical, message);
    }

    /// Wait for this logger's queued records, then flush the shared sinks
    pub fn flush(&self) -> Result<()> {
        if let Some(pool) = &self.inner.pool {
            pool.drain();
        }
        self.inner.sinks.flush_all()
    }

    /// Whether two handles refer to the same logger
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .field("async", &self.is_async())
            .finish()
    }
}
