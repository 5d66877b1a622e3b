//! Process-wide logging context
//!
//! The macros and free functions here route through one installed
//! [`LoggingContext`]. Call [`install`] early in `main` to choose the context
//! explicitly; otherwise the first call installs a default one. [`teardown`]
//! drains and removes it.
//!
//! Statics are never dropped, so nothing drains the installed context at
//! process exit. Call [`teardown`] before returning from `main`; records still
//! queued on an async logger are lost otherwise.
//!
//! ```
//! unlog::info!("starting");
//! // ...
//! unlog::global::teardown();
//! ```

use crate::core::{
    Config, LogLevel, Logger, LoggerError, LoggingContext, Result, Sink, SourceLocation,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

static GLOBAL: RwLock<Option<Arc<LoggingContext>>> = parking_lot::const_rwlock(None);

/// Install `ctx` as the process-wide context
///
/// Fails with [`LoggerError::ContextAlreadyInstalled`] if a context is already
/// installed, including one installed lazily by an earlier logging call.
pub fn install(ctx: LoggingContext) -> Result<Arc<LoggingContext>> {
    let mut slot = GLOBAL.write();
    if slot.is_some() {
        return Err(LoggerError::ContextAlreadyInstalled);
    }

    let ctx = Arc::new(ctx);
    *slot = Some(Arc::clone(&ctx));
    Ok(ctx)
}

/// The installed context, installing a default one on first use
pub fn context() -> Arc<LoggingContext> {
    if let Some(ctx) = GLOBAL.read().as_ref() {
        return Arc::clone(ctx);
    }

    let mut slot = GLOBAL.write();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(LoggingContext::new())))
}

/// Remove the installed context and shut it down
///
/// Returns `false` if nothing was installed or the shutdown timed out.
/// Loggers handed out earlier keep working against the removed context.
pub fn teardown() -> bool {
    let Some(ctx) = GLOBAL.write().take() else {
        return false;
    };
    ctx.shutdown(DEFAULT_SHUTDOWN_TIMEOUT)
}

/// Emit through `logger`, or through the default logger when `None`
pub fn log(
    logger: Option<&Logger>,
    level: LogLevel,
    location: Option<SourceLocation>,
    args: fmt::Arguments<'_>,
) {
    match logger {
        Some(logger) => logger.log(level, location, args),
        None => context().default_logger().log(level, location, args),
    }
}

pub fn set_default_level(level: LogLevel) {
    context().set_default_level(level);
}

pub fn get_default_level() -> LogLevel {
    context().default_level()
}

/// See [`LoggingContext::reset_level`]
pub fn reset_level(level: LogLevel) {
    context().reset_level(level);
}

/// [`reset_level`] back to `Info`
pub fn reset_level_default() {
    reset_level(LogLevel::Info);
}

pub fn add_sink(sink: Box<dyn Sink>) {
    context().add_sink(sink);
}

pub fn flush() -> Result<()> {
    context().flush()
}

pub fn make_logger(config: &Config, make_default: bool) -> Result<Logger> {
    context().make_logger(config, make_default)
}

pub fn default_logger() -> Logger {
    context().default_logger()
}

pub fn logger(name: &str) -> Logger {
    context().logger(name)
}
