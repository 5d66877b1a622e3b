//! Pattern formatter
//!
//! Compiles a `%`-flag template into tokens once, then renders records
//! against it. Supported flags:
//!
//! | Flag | Output |
//! |------|--------|
//! | `%Y` `%m` `%d` | local date (year, month, day) |
//! | `%H` `%M` `%S` | local time (hours, minutes, seconds) |
//! | `%e` | milliseconds of the timestamp, 3 digits |
//! | `%*` | elapsed time since process start, see [`Elapsed`] |
//! | `%n` | logger name |
//! | `%l` / `%L` | level name / short level |
//! | `%^` / `%$` | start / end of the color range |
//! | `%g` / `%s` | source file name |
//! | `%#` | source line |
//! | `%v` | message |
//! | `%t` | thread id |
//! | `%P` | process id |
//! | `%%` | a literal `%` |
//!
//! Unknown flags are copied through literally.

use super::elapsed::Elapsed;
use super::log_record::LogRecord;
use chrono::{Datelike, Local, Timelike};
use std::fmt::Write;
use std::ops::Range;

/// Default line layout for plain sinks
pub const DEFAULT_PATTERN: &str = "[%H:%M:%S.%e] [%*] [%n:%l|%g:%#] >> %v";

/// Default line layout for color-capable sinks; only the level is highlighted
pub const DEFAULT_PATTERN_COLOR: &str = "[%H:%M:%S.%e] [%*] [%n:%^%l%$|%g:%#] >> %v";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    Elapsed,
    LoggerName,
    Level,
    ShortLevel,
    ColorStart,
    ColorEnd,
    SourceFile,
    SourceLine,
    Message,
    ThreadId,
    ProcessId,
}

/// A rendered line, without the trailing newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub text: String,
    /// Byte range a color-capable sink should paint with the level color
    pub color_range: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFormatter {
    pattern: String,
    tokens: Vec<Token>,
}

impl PatternFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let tokens = Self::compile(&pattern);
        Self { pattern, tokens }
    }

    /// Formatter using [`DEFAULT_PATTERN`] or [`DEFAULT_PATTERN_COLOR`]
    pub fn default_for(colorized: bool) -> Self {
        if colorized {
            Self::new(DEFAULT_PATTERN_COLOR)
        } else {
            Self::new(DEFAULT_PATTERN)
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn compile(pattern: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let token = match chars.next() {
                Some('Y') => Token::Year,
                Some('m') => Token::Month,
                Some('d') => Token::Day,
                Some('H') => Token::Hour,
                Some('M') => Token::Minute,
                Some('S') => Token::Second,
                Some('e') => Token::Millis,
                Some('*') => Token::Elapsed,
                Some('n') => Token::LoggerName,
                Some('l') => Token::Level,
                Some('L') => Token::ShortLevel,
                Some('^') => Token::ColorStart,
                Some('$') => Token::ColorEnd,
                Some('g') | Some('s') => Token::SourceFile,
                Some('#') => Token::SourceLine,
                Some('v') => Token::Message,
                Some('t') => Token::ThreadId,
                Some('P') => Token::ProcessId,
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some(other) => {
                    literal.push('%');
                    literal.push(other);
                    continue;
                }
                None => {
                    literal.push('%');
                    continue;
                }
            };

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        tokens
    }

    pub fn format(&self, record: &LogRecord) -> FormattedLine {
        let local = record.timestamp.with_timezone(&Local);
        let mut text = String::with_capacity(self.pattern.len() + record.message.len() + 32);
        let mut color_start = None;
        let mut color_end = None;

        // Writing into a String cannot fail
        for token in &self.tokens {
            match token {
                Token::Literal(s) => text.push_str(s),
                Token::Year => {
                    let _ = write!(text, "{:04}", local.year());
                }
                Token::Month => {
                    let _ = write!(text, "{:02}", local.month());
                }
                Token::Day => {
                    let _ = write!(text, "{:02}", local.day());
                }
                Token::Hour => {
                    let _ = write!(text, "{:02}", local.hour());
                }
                Token::Minute => {
                    let _ = write!(text, "{:02}", local.minute());
                }
                Token::Second => {
                    let _ = write!(text, "{:02}", local.second());
                }
                Token::Millis => {
                    let _ = write!(text, "{:03}", local.timestamp_subsec_millis() % 1000);
                }
                Token::Elapsed => {
                    let _ = write!(text, "{}", Elapsed(record.elapsed));
                }
                Token::LoggerName => text.push_str(&record.logger_name),
                Token::Level => text.push_str(record.level.to_str()),
                Token::ShortLevel => text.push_str(record.level.short_str()),
                Token::ColorStart => color_start = Some(text.len()),
                Token::ColorEnd => color_end = Some(text.len()),
                Token::SourceFile => {
                    if let Some(loc) = record.location {
                        text.push_str(loc.file_name());
                    }
                }
                Token::SourceLine => {
                    let line = record.location.map_or(0, |loc| loc.line);
                    let _ = write!(text, "{}", line);
                }
                Token::Message => text.push_str(&record.message),
                Token::ThreadId => text.push_str(&record.thread_id),
                Token::ProcessId => {
                    let _ = write!(text, "{}", std::process::id());
                }
            }
        }

        let color_range = match (color_start, color_end) {
            (Some(start), Some(end)) if end >= start => Some(start..end),
            (Some(start), _) => Some(start..text.len()),
            _ => None,
        };

        FormattedLine { text, color_range }
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, SourceLocation};
    use std::sync::Arc;
    use std::time::Duration;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, Arc::from("svc"), message.to_string())
            .with_location(SourceLocation::new("src/bin/server.rs", 17, "server"))
            .with_elapsed(Duration::from_millis(61_500))
    }

    #[test]
    fn test_default_pattern_layout() {
        let line = PatternFormatter::default().format(&record("started"));
        assert!(line.text.contains("[+1m01.500s]"), "{}", line.text);
        assert!(line.text.contains("[svc:info|server.rs:17]"), "{}", line.text);
        assert!(line.text.ends_with(">> started"));
        assert_eq!(line.color_range, None);
        assert!(line.text.starts_with('['));
        assert_eq!(&line.text[3..4], ":");
        assert_eq!(&line.text[9..10], ".");
    }

    #[test]
    fn test_color_range_covers_level() {
        let line = PatternFormatter::default_for(true).format(&record("x"));
        let range = line.color_range.clone().expect("color range");
        assert_eq!(&line.text[range], "info");
    }

    #[test]
    fn test_unclosed_color_range_runs_to_end() {
        let line = PatternFormatter::new("%^%l %v").format(&record("tail"));
        assert_eq!(line.color_range, Some(0..line.text.len()));
    }

    #[test]
    fn test_literal_and_unknown_flags() {
        let line = PatternFormatter::new("100%% %q %v %").format(&record("m"));
        assert_eq!(line.text, "100% %q m %");
    }

    #[test]
    fn test_short_level_and_elapsed() {
        let line = PatternFormatter::new("[%*] %L|%n").format(&record("m"));
        assert_eq!(line.text, "[+1m01.500s] I|svc");
    }

    #[test]
    fn test_missing_location() {
        let rec = LogRecord::new(LogLevel::Warn, Arc::from("a"), "m".into());
        let line = PatternFormatter::new("%g:%# %l").format(&rec);
        assert_eq!(line.text, ":0 warning");
    }

    #[test]
    fn test_date_flags_shape() {
        let line = PatternFormatter::new("%Y-%m-%d").format(&record("m"));
        assert_eq!(line.text.len(), 10);
        assert_eq!(line.text.matches('-').count(), 2);
    }

    #[test]
    fn test_pattern_is_kept() {
        let f = PatternFormatter::new("%v");
        assert_eq!(f.pattern(), "%v");
        assert_eq!(f.format(&record("only")).text, "only");
    }
}
