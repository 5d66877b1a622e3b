//! File sink implementation

use crate::core::{LogLevel, LogRecord, LoggerError, PatternFormatter, Result, Sink};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends rendered lines to a file
///
/// A threadsafe file sink takes an exclusive advisory lock around every
/// line and flushes it before unlocking, so other processes (or other sinks
/// on the same path) never see a torn line. The plain variant buffers.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    threadsafe: bool,
    level: LogLevel,
    formatter: PatternFormatter,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    format!("cannot create '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            threadsafe: false,
            level: LogLevel::Trace,
            formatter: PatternFormatter::default(),
        })
    }

    #[must_use]
    pub fn threadsafe(mut self, threadsafe: bool) -> Self {
        self.threadsafe = threadsafe;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_threadsafe(&self) -> bool {
        self.threadsafe
    }

    fn write_locked(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.get_ref().lock_exclusive().map_err(|_| {
            LoggerError::file_sink(self.path.display().to_string(), "failed to acquire file lock")
        })?;

        let written = self
            .writer
            .write_all(bytes)
            .and_then(|()| self.writer.flush());
        let unlocked = self.writer.get_ref().unlock();

        written?;
        unlocked?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn log(&mut self, record: &LogRecord) -> Result<()> {
        let mut line = self.formatter.format(record).text;
        line.push('\n');

        if self.threadsafe {
            self.write_locked(line.as_bytes())
        } else {
            self.writer.write_all(line.as_bytes())?;
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn set_formatter(&mut self, formatter: PatternFormatter) {
        self.formatter = formatter;
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, Arc::from("file"), message.to_string())
    }

    #[test]
    fn test_appends_lines() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("app.log");

        let mut sink = FileSink::new(&path).expect("Failed to create sink");
        sink.set_formatter(PatternFormatter::new("%l %v"));
        sink.log(&record("one")).unwrap();
        sink.log(&record("two")).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "info one\ninfo two\n");
    }

    #[test]
    fn test_threadsafe_writes_are_visible_immediately() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("locked.log");

        let mut sink = FileSink::new(&path).unwrap().threadsafe(true);
        sink.set_formatter(PatternFormatter::new("%v"));
        sink.log(&record("now")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "now\n");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("deeper").join("app.log");

        let sink = FileSink::new(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("append.log");

        for message in ["first", "second"] {
            let mut sink = FileSink::new(&path).unwrap();
            sink.set_formatter(PatternFormatter::new("%v"));
            sink.log(&record(message)).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
