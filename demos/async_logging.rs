//! Async logging example
//!
//! Several producer threads share one async file logger. The queue is kept
//! tiny so producers block on back-pressure; nothing is dropped.
//!
//! Run with: cargo run --example async_logging

use std::sync::Arc;
use std::thread;
use std::time::Instant;
use unlog::prelude::*;

fn main() -> Result<()> {
    println!("=== unlog - Async Logging Example ===\n");

    let log_path = std::env::temp_dir().join("unlog_async_demo.log");
    let ctx = Arc::new(LoggingContext::new());

    let config = Config::builder("worker", SinkKind::File)
        .file_path(&log_path)
        .threadsafe(true)
        .async_mode(2, 16)
        .build()?;
    let logger = ctx.make_logger(&config, true)?;

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|id| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    unlog::info!(logger, "producer {} message {}", id, i);
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }
    ctx.flush()?;

    let metrics = ctx.metrics();
    println!("Wrote 4000 records in {:?}", start.elapsed());
    println!("  dispatched:        {}", metrics.dispatched_count());
    println!("  queue full events: {}", metrics.queue_full_events());
    println!("  write failures:    {}", metrics.write_failures());
    println!("  log file:          {}", log_path.display());

    ctx.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
