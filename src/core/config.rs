//! Logger configuration
//!
//! A [`Config`] describes how a logger and its sink are built: destination,
//! thread-safety, color, async dispatch and pool sizing. It is validated once
//! at construction and never mutated afterwards.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name used by the default logger and the convenience constructors
pub const DEFAULT_LOGGER_NAME: &str = "unlog";

/// Worker threads used by [`Config::make_async_default`]
pub const DEFAULT_THREAD_COUNT: usize = 1;

/// Queue capacity used by [`Config::make_async_default`]
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Where a logger's sink writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SinkKind {
    StdOut,
    StdErr,
    File,
}

impl SinkKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            SinkKind::StdOut => "cout",
            SinkKind::StdErr => "cerr",
            SinkKind::File => "file",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Independent construction flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFlags {
    pub threadsafe: bool,
    pub colorized: bool,
    #[serde(rename = "async")]
    pub async_dispatch: bool,
}

impl ConfigFlags {
    pub const NONE: ConfigFlags = ConfigFlags {
        threadsafe: false,
        colorized: false,
        async_dispatch: false,
    };

    #[must_use]
    pub const fn threadsafe(mut self) -> Self {
        self.threadsafe = true;
        self
    }

    #[must_use]
    pub const fn colorized(mut self) -> Self {
        self.colorized = true;
        self
    }

    #[must_use]
    pub const fn async_dispatch(mut self) -> Self {
        self.async_dispatch = true;
        self
    }
}

/// Validated logger configuration
///
/// # Example
///
/// ```
/// use unlog::core::{Config, SinkKind};
///
/// let config = Config::make_file("app.log", "app").unwrap();
/// assert_eq!(config.kind(), SinkKind::File);
/// assert!(config.is_threadsafe());
///
/// // File destinations require a path
/// assert!(Config::builder("bad", SinkKind::File).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct Config {
    name: String,
    kind: SinkKind,
    flags: ConfigFlags,
    thread_count: usize,
    queue_capacity: usize,
    pattern: Option<String>,
    file_path: Option<PathBuf>,
}

impl Config {
    /// Fully-parameterized constructor
    ///
    /// Fails with [`LoggerError::InvalidConfig`] when a `File` destination has
    /// no (or an empty) path, when a console destination is given a path, or
    /// when the name is empty.
    pub fn new(
        name: impl Into<String>,
        kind: SinkKind,
        flags: ConfigFlags,
        thread_count: usize,
        queue_capacity: usize,
        pattern: Option<String>,
        file_path: Option<PathBuf>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(LoggerError::invalid_config(name, "logger name must not be empty"));
        }

        let has_path = file_path
            .as_ref()
            .is_some_and(|path| !path.as_os_str().is_empty());

        match (kind, has_path) {
            (SinkKind::File, false) => Err(LoggerError::invalid_config(
                name,
                "File logger must have a non-empty file path",
            )),
            (SinkKind::StdOut | SinkKind::StdErr, _) if file_path.is_some() => {
                Err(LoggerError::invalid_config(
                    name,
                    format!("{} logger must not have a file path", kind),
                ))
            }
            _ => Ok(Self {
                name,
                kind,
                flags,
                thread_count,
                queue_capacity,
                pattern,
                file_path,
            }),
        }
    }

    /// Start a builder for the fully-parameterized form
    pub fn builder(name: impl Into<String>, kind: SinkKind) -> ConfigBuilder {
        ConfigBuilder::new(name, kind)
    }

    /// Colorized, synchronous stdout logger
    pub fn make_default(name: impl Into<String>) -> Result<Self> {
        Self::new(
            name,
            SinkKind::StdOut,
            ConfigFlags::NONE.colorized(),
            0,
            0,
            None,
            None,
        )
    }

    /// Colorized, threadsafe stdout logger dispatching through a pool
    pub fn make_async(
        name: impl Into<String>,
        thread_count: usize,
        queue_capacity: usize,
    ) -> Result<Self> {
        Self::new(
            name,
            SinkKind::StdOut,
            ConfigFlags::NONE.colorized().threadsafe().async_dispatch(),
            thread_count,
            queue_capacity,
            None,
            None,
        )
    }

    /// [`make_async`](Self::make_async) with one worker and an 8192-record queue
    pub fn make_async_default(name: impl Into<String>) -> Result<Self> {
        Self::make_async(name, DEFAULT_THREAD_COUNT, DEFAULT_QUEUE_CAPACITY)
    }

    /// Threadsafe, synchronous logger appending to `path`
    pub fn make_file(path: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self> {
        Self::new(
            name,
            SinkKind::File,
            ConfigFlags::NONE.threadsafe(),
            0,
            0,
            None,
            Some(path.into()),
        )
    }

    /// Same config with a custom pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    pub fn flags(&self) -> ConfigFlags {
        self.flags
    }

    pub fn is_threadsafe(&self) -> bool {
        self.flags.threadsafe
    }

    /// Only meaningful for console destinations
    pub fn is_colorized(&self) -> bool {
        self.flags.colorized
    }

    pub fn is_async(&self) -> bool {
        self.flags.async_dispatch
    }

    pub fn is_stdout(&self) -> bool {
        self.kind == SinkKind::StdOut
    }

    pub fn is_stderr(&self) -> bool {
        self.kind == SinkKind::StdErr
    }

    pub fn is_file(&self) -> bool {
        self.kind == SinkKind::File && self.file_path.is_some()
    }

    /// Requested worker count; 0 means the pool default
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Requested queue capacity; 0 means the pool default
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config[ name={} | type={} ]", self.name, self.kind)
    }
}

/// Builder for [`Config::new`]
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    name: String,
    kind: SinkKind,
    flags: ConfigFlags,
    thread_count: usize,
    queue_capacity: usize,
    pattern: Option<String>,
    file_path: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new(name: impl Into<String>, kind: SinkKind) -> Self {
        Self {
            name: name.into(),
            kind,
            flags: ConfigFlags::NONE,
            thread_count: 0,
            queue_capacity: 0,
            pattern: None,
            file_path: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags(mut self, flags: ConfigFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn threadsafe(mut self, threadsafe: bool) -> Self {
        self.flags.threadsafe = threadsafe;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colorized(mut self, colorized: bool) -> Self {
        self.flags.colorized = colorized;
        self
    }

    /// Dispatch through an async pool of `thread_count` workers
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, thread_count: usize, queue_capacity: usize) -> Self {
        self.flags.async_dispatch = true;
        self.thread_count = thread_count;
        self.queue_capacity = queue_capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Config> {
        Config::new(
            self.name,
            self.kind,
            self.flags,
            self.thread_count,
            self.queue_capacity,
            self.pattern,
            self.file_path,
        )
    }
}

/// Unchecked wire form; deserialized configs go back through [`Config::new`]
#[derive(Serialize, Deserialize)]
struct RawConfig {
    name: String,
    #[serde(rename = "destination")]
    kind: SinkKind,
    #[serde(flatten)]
    flags: ConfigFlags,
    #[serde(default)]
    thread_count: usize,
    #[serde(default)]
    queue_capacity: usize,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    file_path: Option<PathBuf>,
}

impl TryFrom<RawConfig> for Config {
    type Error = LoggerError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Config::new(
            raw.name,
            raw.kind,
            raw.flags,
            raw.thread_count,
            raw.queue_capacity,
            raw.pattern,
            raw.file_path,
        )
    }
}

impl From<Config> for RawConfig {
    fn from(config: Config) -> Self {
        RawConfig {
            name: config.name,
            kind: config.kind,
            flags: config.flags,
            thread_count: config.thread_count,
            queue_capacity: config.queue_capacity,
            pattern: config.pattern,
            file_path: config.file_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_default() {
        let cfg = Config::make_default("demo").unwrap();
        assert_eq!(cfg.name(), "demo");
        assert!(cfg.is_stdout());
        assert!(cfg.is_colorized());
        assert!(!cfg.is_threadsafe());
        assert!(!cfg.is_async());
        assert_eq!(cfg.thread_count(), 0);
        assert_eq!(cfg.queue_capacity(), 0);
        assert_eq!(cfg.file_path(), None);
    }

    #[test]
    fn test_make_async() {
        let cfg = Config::make_async("async", 2, 4096).unwrap();
        assert!(cfg.is_stdout());
        assert!(cfg.is_colorized());
        assert!(cfg.is_threadsafe());
        assert!(cfg.is_async());
        assert_eq!(cfg.thread_count(), 2);
        assert_eq!(cfg.queue_capacity(), 4096);

        let cfg = Config::make_async_default("async").unwrap();
        assert_eq!(cfg.thread_count(), DEFAULT_THREAD_COUNT);
        assert_eq!(cfg.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_make_file() {
        let cfg = Config::make_file("app.log", "file").unwrap();
        assert_eq!(cfg.kind(), SinkKind::File);
        assert!(cfg.is_file());
        assert!(!cfg.is_colorized());
        assert!(cfg.is_threadsafe());
        assert!(!cfg.is_async());
        assert_eq!(cfg.file_path(), Some(Path::new("app.log")));
    }

    #[test]
    fn test_file_requires_path() {
        let err = Config::builder("bad", SinkKind::File).threadsafe(true).build();
        assert!(matches!(err, Err(LoggerError::InvalidConfig { .. })));

        let err = Config::builder("bad", SinkKind::File).file_path("").build();
        assert!(matches!(err, Err(LoggerError::InvalidConfig { .. })));

        assert!(Config::make_file("", "bad").is_err());
    }

    #[test]
    fn test_console_rejects_path() {
        let err = Config::builder("bad", SinkKind::StdOut)
            .colorized(true)
            .file_path("bad.log")
            .build();
        assert!(matches!(err, Err(LoggerError::InvalidConfig { .. })));

        let err = Config::builder("bad", SinkKind::StdErr).file_path("").build();
        assert!(matches!(err, Err(LoggerError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(Config::make_default("").is_err());
    }

    #[test]
    fn test_zero_sizes_are_legal() {
        let cfg = Config::builder("pool", SinkKind::StdErr)
            .async_mode(0, 0)
            .build()
            .unwrap();
        assert!(cfg.is_async());
        assert!(cfg.is_stderr());
    }

    #[test]
    fn test_with_pattern_is_value_copy() {
        let base = Config::make_default("p").unwrap();
        let custom = base.clone().with_pattern("[%*] %v");
        assert_eq!(base.pattern(), None);
        assert_eq!(custom.pattern(), Some("[%*] %v"));
    }

    #[test]
    fn test_display() {
        let cfg = Config::make_file("x.log", "files").unwrap();
        assert_eq!(cfg.to_string(), "Config[ name=files | type=file ]");
    }
}
