//! Console sink implementation

use crate::core::{FormattedLine, LogLevel, LogRecord, PatternFormatter, Result, Sink};
use colored::Colorize;
use std::io::{self, Write};

/// Standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

pub struct ConsoleSink {
    target: ConsoleTarget,
    use_colors: bool,
    threadsafe: bool,
    level: LogLevel,
    formatter: PatternFormatter,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self {
            target,
            use_colors: true,
            threadsafe: true,
            level: LogLevel::Trace,
            formatter: PatternFormatter::default_for(true),
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    /// Enable or disable level highlighting
    ///
    /// # Example
    ///
    /// ```
    /// use unlog::sinks::ConsoleSink;
    /// use unlog::Sink;
    ///
    /// let sink = ConsoleSink::stdout().with_colors(false);
    /// assert!(!sink.is_color());
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self.formatter = PatternFormatter::default_for(use_colors);
        self
    }

    /// Hold the stream lock for the whole line
    ///
    /// When disabled, the pieces of a line are written one by one and may
    /// interleave with other writers of the same stream in this process.
    #[must_use]
    pub fn threadsafe(mut self, threadsafe: bool) -> Self {
        self.threadsafe = threadsafe;
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    pub fn is_threadsafe(&self) -> bool {
        self.threadsafe
    }

    fn write_line<W: Write>(&self, out: &mut W, line: &FormattedLine, level: LogLevel) -> io::Result<()> {
        match (&line.color_range, self.use_colors) {
            (Some(range), true) => {
                out.write_all(line.text[..range.start].as_bytes())?;
                let painted = line.text[range.clone()].color(level.color_code());
                write!(out, "{}", painted)?;
                out.write_all(line.text[range.end..].as_bytes())?;
            }
            _ => out.write_all(line.text.as_bytes())?,
        }
        out.write_all(b"\n")
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink for ConsoleSink {
    fn log(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format(record);

        match (self.target, self.threadsafe) {
            (ConsoleTarget::Stdout, true) => self.write_line(&mut io::stdout().lock(), &line, record.level)?,
            (ConsoleTarget::Stdout, false) => self.write_line(&mut io::stdout(), &line, record.level)?,
            (ConsoleTarget::Stderr, true) => self.write_line(&mut io::stderr().lock(), &line, record.level)?,
            (ConsoleTarget::Stderr, false) => self.write_line(&mut io::stderr(), &line, record.level)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush()?,
            ConsoleTarget::Stderr => io::stderr().flush()?,
        }
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

    fn is_color(&self) -> bool {
        self.use_colors
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record() -> LogRecord {
        LogRecord::new(LogLevel::Warn, Arc::from("console"), "hello".into())
    }

    #[test]
    fn test_plain_line() {
        let sink = ConsoleSink::stdout().with_colors(false);
        let line = PatternFormatter::new("%^%l%$ %v").format(&record());
        let mut out = Vec::new();
        sink.write_line(&mut out, &line, LogLevel::Warn).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "warning hello\n");
    }

    #[test]
    fn test_colored_line_keeps_text() {
        colored::control::set_override(true);
        let sink = ConsoleSink::stdout();
        let line = PatternFormatter::new("[%^%l%$] %v").format(&record());
        let mut out = Vec::new();
        sink.write_line(&mut out, &line, LogLevel::Warn).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("warning"));
        assert!(text.contains("\u{1b}["), "expected ANSI escape in {:?}", text);
        assert!(text.ends_with("] hello\n"));
    }

    #[test]
    fn test_names_and_flags() {
        let sink = ConsoleSink::stderr().threadsafe(false);
        assert_eq!(sink.name(), "stderr");
        assert_eq!(sink.target(), ConsoleTarget::Stderr);
        assert!(!sink.is_threadsafe());
        assert!(sink.is_color());
        assert_eq!(sink.level(), LogLevel::Trace);
    }

    #[test]
    fn test_level_filter() {
        let mut sink = ConsoleSink::stdout();
        sink.set_level(LogLevel::Error);
        assert!(!sink.should_log(LogLevel::Warn));
        assert!(sink.should_log(LogLevel::Critical));
    }
}
