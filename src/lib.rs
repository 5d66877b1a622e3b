//! # unlog
//!
//! A small logging library: named loggers sharing one fan-out sink layer,
//! spdlog-style pattern formatting, and an optional asynchronous dispatch pool.
//!
//! ## Features
//!
//! - **Named loggers**: each with its own level, built lazily or from a [`Config`]
//! - **Shared sinks**: console (optionally colorized) and append-only files
//! - **Async dispatch**: bounded queue with back-pressure, nothing dropped
//! - **Call-site macros**: file and line captured automatically
//!
//! ## Quick start
//!
//! ```
//! use unlog::prelude::*;
//!
//! let ctx = LoggingContext::new();
//! let config = Config::make_default("svc").unwrap();
//! let logger = ctx.make_logger(&config, true).unwrap();
//!
//! unlog::info!(logger, "started on port {}", 8080);
//! ctx.flush().unwrap();
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Config, ConfigFlags, LogLevel, Logger, LoggerError, LoggerState, LoggingContext, Result,
        Sink, SinkKind, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{CaptureBuffer, CaptureSink, ConsoleSink, FileSink};
}

pub use crate::core::{
    Config, ConfigBuilder, ConfigFlags, DispatchMetrics, LogLevel, LogRecord, Logger, LoggerError,
    LoggerState, LoggingContext, PatternFormatter, Result, Sink, SinkKind, SourceLocation,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{CaptureBuffer, CaptureSink, ConsoleSink, ConsoleTarget, FileSink};
