//! Basic logger usage example
//!
//! Demonstrates the global default logger, named loggers and level control.
//!
//! Run with: cargo run --example basic_usage

use unlog::prelude::*;
use unlog::{critical, debug, info, trace, warn};

fn main() -> Result<()> {
    println!("=== unlog - Basic Usage Example ===\n");

    // Unqualified macros go to the default logger of the global context
    println!("1. Default logger:");
    info!("application starting");
    warn!("config file not found, using defaults");

    // A named logger built from a config becomes the default
    println!("\n2. Named logger at every level:");
    let config = Config::make_default("svc")?;
    let svc = unlog::global::make_logger(&config, true)?;
    svc.set_level(LogLevel::Trace);
    trace!(svc, "This is a trace message");
    debug!(svc, "This is a debug message");
    info!(svc, "This is an info message");
    warn!(svc, "This is a warning message");
    unlog::error!(svc, "This is an error message");
    critical!(svc, "This is a critical message");

    println!("\n3. Resetting the level everywhere:");
    unlog::global::reset_level(LogLevel::Warn);
    println!("   Level reset to WARNING - info won't show:");
    info!("Info message (hidden)");
    warn!("Warning message (visible)");

    println!("\n4. Custom pattern on stderr:");
    let config = Config::builder("audit", SinkKind::StdErr)
        .colorized(true)
        .pattern("%Y-%m-%d %H:%M:%S [%^%L%$] %n: %v")
        .build()?;
    let audit = unlog::global::make_logger(&config, false)?;
    unlog::log!(audit, LogLevel::Error, "user {} denied", 42);

    unlog::global::flush()?;
    unlog::global::teardown();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
