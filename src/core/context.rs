//! Logging context: the logger registry
//!
//! A [`LoggingContext`] owns everything that would otherwise be process-wide
//! state: the name → logger registry, the default logger, the default level,
//! the shared [`SinkMultiplexer`] and the async [`DispatchPool`]s. Applications
//! create one at their entry point and hand out [`Logger`]s from it; the
//! [`global`](crate::global) module wraps one instance for call sites that do
//! not name a logger.

use super::{
    config::{Config, SinkKind, DEFAULT_LOGGER_NAME},
    dispatch_pool::{DispatchPool, PoolKey, DEFAULT_SHUTDOWN_TIMEOUT},
    elapsed,
    error::{LoggerError, Result},
    log_level::LogLevel,
    logger::Logger,
    metrics::DispatchMetrics,
    multiplexer::SinkMultiplexer,
    sink::Sink,
};
use crate::sinks::{ConsoleSink, FileSink};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Registration state of a logger name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// Never referenced
    Unregistered,
    /// Name held, no logger built yet
    Reserved,
    /// Logger built and wired to the sinks
    Constructed,
}

enum Slot {
    Reserved,
    Constructed(Logger),
}

pub struct LoggingContext {
    loggers: Mutex<HashMap<String, Slot>>,
    default_level: RwLock<LogLevel>,
    default_logger: RwLock<Option<Logger>>,
    pools: Mutex<HashMap<PoolKey, Arc<DispatchPool>>>,
    sinks: Arc<SinkMultiplexer>,
    metrics: Arc<DispatchMetrics>,
}

impl LoggingContext {
    pub fn new() -> Self {
        Self::with_default_level(LogLevel::Info)
    }

    pub fn with_default_level(level: LogLevel) -> Self {
        elapsed::process_start();
        let metrics = Arc::new(DispatchMetrics::new());
        let loggers = HashMap::from([(DEFAULT_LOGGER_NAME.to_string(), Slot::Reserved)]);

        Self {
            loggers: Mutex::new(loggers),
            default_level: RwLock::new(level),
            default_logger: RwLock::new(None),
            pools: Mutex::new(HashMap::new()),
            sinks: Arc::new(SinkMultiplexer::with_metrics(Arc::clone(&metrics))),
            metrics,
        }
    }

    /// Hold `name` without building a logger for it
    pub fn reserve(&self, name: &str) {
        self.loggers
            .lock()
            .entry(name.to_string())
            .or_insert(Slot::Reserved);
    }

    pub fn state(&self, name: &str) -> LoggerState {
        match self.loggers.lock().get(name) {
            None => LoggerState::Unregistered,
            Some(Slot::Reserved) => LoggerState::Reserved,
            Some(Slot::Constructed(_)) => LoggerState::Constructed,
        }
    }

    /// Registered names, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// The logger called `name`, built from the default config on first use
    ///
    /// A lazily built logger only installs its colorized stdout sink when
    /// the context has no sinks yet; it never displaces sinks the
    /// application installed.
    pub fn logger(&self, name: &str) -> Logger {
        let mut loggers = self.loggers.lock();

        if let Some(Slot::Constructed(logger)) = loggers.get(name) {
            return logger.clone();
        }

        if self.sinks.is_empty() {
            self.sinks.add(Box::new(ConsoleSink::stdout()), None);
        }

        let logger = Logger::new(name, self.default_level(), Arc::clone(&self.sinks), None);
        loggers.insert(name.to_string(), Slot::Constructed(logger.clone()));
        logger
    }

    /// Build a logger from `config`
    ///
    /// The sink selected by the config becomes the only sink of the context.
    /// Fails with [`LoggerError::DuplicateLoggerName`] if the name already
    /// has a constructed logger; that logger is left untouched.
    pub fn make_logger(&self, config: &Config, make_default: bool) -> Result<Logger> {
        let mut loggers = self.loggers.lock();

        if let Some(Slot::Constructed(_)) = loggers.get(config.name()) {
            return Err(LoggerError::duplicate_name(config.name()));
        }

        let sink = Self::initialize(config)?;
        let pool = if config.is_async() {
            Some(self.get_or_create_pool(config.thread_count(), config.queue_capacity())?)
        } else {
            None
        };

        self.sinks.replace_all(sink, config.pattern());

        let logger = Logger::new(config.name(), self.default_level(), Arc::clone(&self.sinks), pool);
        loggers.insert(config.name().to_string(), Slot::Constructed(logger.clone()));
        drop(loggers);

        if make_default {
            *self.default_logger.write() = Some(logger.clone());
        }
        Ok(logger)
    }

    /// Select the physical sink a config describes
    fn initialize(config: &Config) -> Result<Box<dyn Sink>> {
        let sink: Box<dyn Sink> = match config.kind() {
            SinkKind::StdOut => Box::new(
                ConsoleSink::stdout()
                    .with_colors(config.is_colorized())
                    .threadsafe(config.is_threadsafe()),
            ),
            SinkKind::StdErr => Box::new(
                ConsoleSink::stderr()
                    .with_colors(config.is_colorized())
                    .threadsafe(config.is_threadsafe()),
            ),
            SinkKind::File => {
                let path = config.file_path().ok_or_else(|| {
                    LoggerError::invalid_config(config.name(), "File logger must have a file path")
                })?;
                Box::new(FileSink::new(path)?.threadsafe(config.is_threadsafe()))
            }
        };
        Ok(sink)
    }

    /// The async pool for these parameters, spawned on first request
    ///
    /// Zero values select the defaults; each distinct normalized pair gets
    /// its own pool for the lifetime of the context.
    pub fn get_or_create_pool(
        &self,
        thread_count: usize,
        queue_capacity: usize,
    ) -> Result<Arc<DispatchPool>> {
        let key = PoolKey::new(thread_count, queue_capacity);
        let mut pools = self.pools.lock();

        if let Some(pool) = pools.get(&key) {
            return Ok(Arc::clone(pool));
        }

        let pool = Arc::new(DispatchPool::new(
            key,
            Arc::clone(&self.sinks),
            Arc::clone(&self.metrics),
        )?);
        pools.insert(key, Arc::clone(&pool));
        Ok(pool)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.lock().len()
    }

    /// Target of unqualified logging calls
    ///
    /// Either the logger last built with `make_default`, or a lazily built
    /// logger under the reserved name `unlog`.
    pub fn default_logger(&self) -> Logger {
        if let Some(logger) = self.default_logger.read().as_ref() {
            return logger.clone();
        }

        let mut slot = self.default_logger.write();
        slot.get_or_insert_with(|| self.logger(DEFAULT_LOGGER_NAME))
            .clone()
    }

    /// Level given to loggers built from now on
    pub fn set_default_level(&self, level: LogLevel) {
        *self.default_level.write() = level;
    }

    pub fn default_level(&self) -> LogLevel {
        *self.default_level.read()
    }

    /// Set the default level, the default logger's level, and every sink's level
    ///
    /// Existing loggers keep their own thresholds, but their records now pass
    /// through sinks that drop anything below `level`.
    pub fn reset_level(&self, level: LogLevel) {
        self.set_default_level(level);
        if let Some(logger) = self.default_logger.read().as_ref() {
            logger.set_level(level);
        }
        self.sinks.broadcast_level(level);
    }

    /// Append a sink with the default pattern for its kind
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        self.sinks.add(sink, None);
    }

    pub fn add_sink_with_pattern(&self, sink: Box<dyn Sink>, pattern: &str) {
        self.sinks.add(sink, Some(pattern));
    }

    /// Make `sink` the only sink, formatted with the config's pattern
    pub fn set_sink(&self, config: &Config, sink: Box<dyn Sink>) {
        self.sinks.replace_all(sink, config.pattern());
    }

    pub fn sinks(&self) -> &Arc<SinkMultiplexer> {
        &self.sinks
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    fn pool_list(&self) -> Vec<Arc<DispatchPool>> {
        self.pools.lock().values().cloned().collect()
    }

    /// Wait for every queued record, then flush every sink
    pub fn flush(&self) -> Result<()> {
        for pool in self.pool_list() {
            pool.drain();
        }
        self.sinks.flush_all()
    }

    /// Drain and stop every pool, then flush
    ///
    /// Async loggers keep working afterwards, writing synchronously.
    /// Returns `true` if everything finished within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let mut clean = true;
        for pool in self.pool_list() {
            clean &= pool.shutdown(timeout);
        }

        if let Err(e) = self.sinks.flush_all() {
            eprintln!("[UNLOG ERROR] Failed to flush during shutdown: {}", e);
            clean = false;
        }
        clean
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoggingContext {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let failures = self.metrics.write_failures();
        if failures > 0 {
            eprintln!(
                "[UNLOG WARNING] Logging context shutting down with {} failed sink writes",
                failures
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::CaptureSink;

    fn capture(ctx: &LoggingContext, pattern: &str) -> crate::sinks::CaptureBuffer {
        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        ctx.add_sink_with_pattern(Box::new(sink), pattern);
        buffer
    }

    #[test]
    fn test_state_machine() {
        let ctx = LoggingContext::new();
        capture(&ctx, "%v");

        assert_eq!(ctx.state("db"), LoggerState::Unregistered);
        ctx.reserve("db");
        assert_eq!(ctx.state("db"), LoggerState::Reserved);
        ctx.logger("db");
        assert_eq!(ctx.state("db"), LoggerState::Constructed);
    }

    #[test]
    fn test_reserved_name_can_be_made() {
        let ctx = LoggingContext::new();
        ctx.reserve("svc");
        let config = Config::make_default("svc").unwrap();
        assert!(ctx.make_logger(&config, false).is_ok());
        assert_eq!(ctx.state("svc"), LoggerState::Constructed);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let ctx = LoggingContext::new();
        let config = Config::make_default("svc").unwrap();
        let first = ctx.make_logger(&config, false).unwrap();

        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        ctx.set_sink(&config.clone().with_pattern("%v"), Box::new(sink));

        let err = ctx.make_logger(&config, true).unwrap_err();
        assert!(matches!(err, LoggerError::DuplicateLoggerName { .. }));

        first.info("still alive");
        assert_eq!(buffer.lines(), vec!["still alive"]);
        assert!(ctx.logger("svc").ptr_eq(&first));
    }

    #[test]
    fn test_lazy_logger_keeps_application_sinks() {
        let ctx = LoggingContext::new();
        let buffer = capture(&ctx, "%n %v");

        ctx.logger("late").info("hello");
        assert_eq!(ctx.sinks().len(), 1);
        assert_eq!(buffer.lines(), vec!["late hello"]);
    }

    #[test]
    fn test_lazy_logger_installs_console_when_empty() {
        let ctx = LoggingContext::new();
        ctx.logger("first");
        assert_eq!(ctx.sinks().sink_names(), vec!["stdout"]);
        ctx.logger("second");
        assert_eq!(ctx.sinks().len(), 1);
    }

    #[test]
    fn test_default_logger_is_lazy_and_stable() {
        let ctx = LoggingContext::new();
        capture(&ctx, "%v");
        assert_eq!(ctx.state(DEFAULT_LOGGER_NAME), LoggerState::Reserved);
        assert_eq!(ctx.logger_names(), vec![DEFAULT_LOGGER_NAME]);

        let a = ctx.default_logger();
        let b = ctx.default_logger();
        assert_eq!(a.name(), DEFAULT_LOGGER_NAME);
        assert!(a.ptr_eq(&b));
        assert_eq!(ctx.state(DEFAULT_LOGGER_NAME), LoggerState::Constructed);
    }

    #[test]
    fn test_make_default_redirects_unqualified_calls() {
        let ctx = LoggingContext::new();
        let config = Config::make_default("svc").unwrap();
        let svc = ctx.make_logger(&config, true).unwrap();
        assert!(ctx.default_logger().ptr_eq(&svc));
    }

    #[test]
    fn test_make_logger_replaces_sinks() {
        let ctx = LoggingContext::new();
        capture(&ctx, "%v");
        capture(&ctx, "%v");

        let config = Config::builder("err", SinkKind::StdErr).build().unwrap();
        ctx.make_logger(&config, false).unwrap();
        assert_eq!(ctx.sinks().sink_names(), vec!["stderr"]);
    }

    #[test]
    fn test_default_level_applies_at_creation() {
        let ctx = LoggingContext::new();
        capture(&ctx, "%v");

        ctx.set_default_level(LogLevel::Warn);
        let quiet = ctx.logger("quiet");
        assert_eq!(quiet.level(), LogLevel::Warn);

        ctx.set_default_level(LogLevel::Debug);
        assert_eq!(quiet.level(), LogLevel::Warn);
        assert_eq!(ctx.logger("chatty").level(), LogLevel::Debug);
    }

    #[test]
    fn test_reset_level_broadcasts() {
        let ctx = LoggingContext::new();
        let buffer = capture(&ctx, "%n %v");
        let default = ctx.default_logger();
        let other = ctx.logger("other");
        other.set_level(LogLevel::Trace);

        ctx.reset_level(LogLevel::Error);
        assert_eq!(ctx.default_level(), LogLevel::Error);
        assert_eq!(default.level(), LogLevel::Error);
        assert_eq!(other.level(), LogLevel::Trace);
        assert_eq!(ctx.sinks().sink_levels(), vec![LogLevel::Error]);

        other.warn("blocked by sink");
        other.error("passes");
        default.warn("blocked by logger");
        assert_eq!(buffer.lines(), vec!["other passes"]);
    }

    #[test]
    fn test_pools_are_cached_per_key() {
        let ctx = LoggingContext::new();
        let a = ctx.get_or_create_pool(0, 0).unwrap();
        let b = ctx.get_or_create_pool(1, 8192).unwrap();
        let c = ctx.get_or_create_pool(2, 64).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(ctx.pool_count(), 2);
    }

    #[test]
    fn test_async_logger_flushes_through_pool() {
        let ctx = LoggingContext::new();
        let config = Config::make_async("async", 1, 4).unwrap().with_pattern("%v");
        let logger = ctx.make_logger(&config, false).unwrap();
        assert!(logger.is_async());

        let sink = CaptureSink::new();
        let buffer = sink.buffer();
        ctx.set_sink(&config, Box::new(sink));

        for i in 0..50 {
            logger.info(format!("async {}", i));
        }
        ctx.flush().unwrap();

        assert_eq!(buffer.lines().len(), 50);
        assert_eq!(buffer.lines()[49], "async 49");
    }

    #[test]
    fn test_file_logger_bad_path_leaves_registry_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();

        let config = Config::make_file(blocker.join("app.log"), "files").unwrap();
        let ctx = LoggingContext::new();
        assert!(ctx.make_logger(&config, false).is_err());
        assert_eq!(ctx.state("files"), LoggerState::Unregistered);
    }
}
