//! Log record structure

use super::elapsed;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<Arc<str>>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> Arc<str> {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| Arc::from(format!("{:?}", std::thread::current().id())))
            .clone()
    })
}

fn current_thread_name() -> Option<Arc<str>> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(Arc::from))
            .clone()
    })
}

/// Where a record was produced, as captured by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    pub module_path: &'static str,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32, module_path: &'static str) -> Self {
        Self {
            file,
            line,
            module_path,
        }
    }

    /// File name without its directories
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub logger_name: Arc<str>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Time since process start when the record was created
    pub elapsed: Duration,
    pub location: Option<SourceLocation>,
    pub thread_id: Arc<str>,
    pub thread_name: Option<Arc<str>>,
}

impl LogRecord {
    pub fn new(level: LogLevel, logger_name: Arc<str>, message: String) -> Self {
        Self {
            level,
            logger_name,
            message,
            timestamp: Utc::now(),
            elapsed: elapsed::since_start(),
            location: None,
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Override the elapsed stamp, mostly for deterministic rendering
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
