//! Logging macros for ergonomic log message formatting.
//!
//! Every macro captures the call site (`file!`, `line!`, `module_path!`) and
//! formats lazily through `format_args!`, so a record below the logger's
//! threshold costs one level comparison. Mismatched format arguments are
//! compile errors.
//!
//! Each level macro has two forms: a format string alone logs through the
//! global default logger, a leading logger expression logs through that
//! logger.
//!
//! # Examples
//!
//! ```
//! use unlog::prelude::*;
//! use unlog::info;
//!
//! let ctx = LoggingContext::new();
//! let sink = CaptureSink::new();
//! let buffer = sink.buffer();
//! ctx.add_sink_with_pattern(Box::new(sink), "%l %v");
//! let logger = ctx.logger("app");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! assert_eq!(buffer.contents(), "info Server listening on port 8080\n");
//! ```

/// Log at a runtime-chosen level.
///
/// `log!(level; ...)` goes to the global default logger,
/// `log!(logger, level, ...)` to the given one.
///
/// # Examples
///
/// ```
/// # use unlog::prelude::*;
/// # let ctx = LoggingContext::new();
/// # ctx.add_sink(Box::new(CaptureSink::new()));
/// # let logger = ctx.logger("doc");
/// use unlog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr; $($arg:tt)+) => {
        $crate::global::log(
            ::core::option::Option::None,
            $level,
            ::core::option::Option::Some($crate::SourceLocation::new(
                file!(),
                line!(),
                module_path!(),
            )),
            format_args!($($arg)+),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::Logger::log(
            &$logger,
            $level,
            ::core::option::Option::Some($crate::SourceLocation::new(
                file!(),
                line!(),
                module_path!(),
            )),
            format_args!($($arg)+),
        )
    };
}

/// Log a trace-level message.
///
/// ```
/// # use unlog::prelude::*;
/// # let ctx = LoggingContext::new();
/// # ctx.add_sink(Box::new(CaptureSink::new()));
/// # let logger = ctx.logger("doc");
/// # logger.set_level(LogLevel::Trace);
/// use unlog::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($fmt:literal $($rest:tt)*) => {
        $crate::log!($crate::LogLevel::Trace; $fmt $($rest)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($rest:tt)*) => {
        $crate::log!($crate::LogLevel::Debug; $fmt $($rest)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use unlog::prelude::*;
/// # let ctx = LoggingContext::new();
/// # ctx.add_sink(Box::new(CaptureSink::new()));
/// # let logger = ctx.logger("doc");
/// use unlog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($fmt:literal $($rest:tt)*) => {
        $crate::log!($crate::LogLevel::Info; $fmt $($rest)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($rest:tt)*) => {
        $crate::log!($crate::LogLevel::Warn; $fmt $($rest)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($fmt:literal $($rest:tt)*) => {
        $crate::log!($crate::LogLevel::Error; $fmt $($rest)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// ```
/// # use unlog::prelude::*;
/// # let ctx = LoggingContext::new();
/// # ctx.add_sink(Box::new(CaptureSink::new()));
/// # let logger = ctx.logger("doc");
/// use unlog::critical;
/// critical!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    ($fmt:literal $($rest:tt)*) => {
        $crate::log!($crate::LogLevel::Critical; $fmt $($rest)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
