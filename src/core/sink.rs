//! Sink trait for log output destinations

use super::{error::Result, log_level::LogLevel, log_record::LogRecord, pattern::PatternFormatter};

/// A physical log destination.
///
/// Sinks are owned by the [`SinkMultiplexer`](crate::core::SinkMultiplexer),
/// which serializes every call through its own lock; a sink only needs to be
/// `Send`. Each sink renders with its own [`PatternFormatter`] and drops
/// records below its own level.
pub trait Sink: Send {
    /// Render and write one record
    fn log(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn level(&self) -> LogLevel;

    fn set_level(&mut self, level: LogLevel);

    fn set_formatter(&mut self, formatter: PatternFormatter);

    /// Whether the sink paints the `%^ … %$` range; selects the colorized default pattern
    fn is_color(&self) -> bool {
        false
    }

    fn name(&self) -> &str;

    #[inline]
    fn should_log(&self, level: LogLevel) -> bool {
        level.passes(self.level())
    }
}
