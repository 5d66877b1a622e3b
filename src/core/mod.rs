//! Core logger types and traits

pub mod config;
pub mod context;
pub mod dispatch_pool;
pub mod elapsed;
pub mod error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod multiplexer;
pub mod pattern;
pub mod sink;

pub use config::{
    Config, ConfigBuilder, ConfigFlags, SinkKind, DEFAULT_LOGGER_NAME, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_THREAD_COUNT,
};
pub use context::{LoggerState, LoggingContext};
pub use dispatch_pool::{DispatchPool, PoolKey, DEFAULT_SHUTDOWN_TIMEOUT};
pub use elapsed::{format_elapsed, Elapsed};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use log_record::{LogRecord, SourceLocation};
pub use logger::Logger;
pub use metrics::DispatchMetrics;
pub use multiplexer::SinkMultiplexer;
pub use pattern::{FormattedLine, PatternFormatter, DEFAULT_PATTERN, DEFAULT_PATTERN_COLOR};
pub use sink::Sink;
