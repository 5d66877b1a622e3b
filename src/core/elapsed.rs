//! Elapsed time since process start
//!
//! Rendered by the `%*` pattern flag with adaptive units:
//!
//! - `+{h}h{mm}m{ss}.{mmm}s` once an hour has passed
//! - `+{m}m{ss}.{mmm}s` once a minute has passed
//! - `+{s}.{mmm}s` otherwise

use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// The instant the process started logging.
///
/// Captured on first call and read-only afterwards. Creating a
/// [`LoggingContext`](crate::core::LoggingContext) forces the capture.
pub fn process_start() -> Instant {
    *STARTED_AT.get_or_init(Instant::now)
}

/// Monotonic time elapsed since [`process_start`].
pub fn since_start() -> Duration {
    process_start().elapsed()
}

/// A duration rendered the way the `%*` flag prints it.
///
/// ```
/// use std::time::Duration;
/// use unlog::core::Elapsed;
///
/// assert_eq!(Elapsed(Duration::from_millis(61_500)).to_string(), "+1m01.500s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs / 60) % 60;
        let seconds = total_secs % 60;
        let millis = self.0.subsec_millis();

        if hours > 0 {
            write!(f, "+{}h{:02}m{:02}.{:03}s", hours, minutes, seconds, millis)
        } else if total_secs >= 60 {
            write!(f, "+{}m{:02}.{:03}s", minutes, seconds, millis)
        } else {
            write!(f, "+{}.{:03}s", seconds, millis)
        }
    }
}

/// Render `elapsed` as a string. See [`Elapsed`].
pub fn format_elapsed(elapsed: Duration) -> String {
    Elapsed(elapsed).to_string()
}
