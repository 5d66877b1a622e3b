//! Sink implementations

pub mod capture;
pub mod console;
pub mod file;

pub use capture::{CaptureBuffer, CaptureSink};
pub use console::{ConsoleSink, ConsoleTarget};
pub use file::FileSink;

pub use crate::core::Sink;
