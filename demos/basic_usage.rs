//! Basic pipeline usage example
//!
//! Demonstrates a console sink, enrichment, child loggers and a level
//! switch changed at runtime.
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;
use structured_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Structured Logger - Basic Usage Example ===\n");

    SelfLog::enable_stderr();

    let switch = LoggingLevelSwitch::new(LogEventLevel::Verbose);
    let logger = LoggerConfiguration::new()
        .minimum_level_controlled_by(switch.clone())
        .enrich_with_property("Application", "demo", false)
        .enrich_with(Arc::new(ThreadEnricher::new()))
        .write_to(Arc::new(ConsoleSink::new()))
        .create_logger()?;

    println!("1. Logging at different levels:");
    verbose!(logger, "This is a verbose message")?;
    debug!(logger, "This is a debug message")?;
    information!(logger, "User {UserId} signed in from {Ip}", 42, "10.0.0.7")?;
    warning!(logger, "Disk {Mount} at {Percent:F1}%", "/var", 91.25)?;
    error!(logger, "This is an error message")?;
    fatal!(logger, "This is a fatal message")?;

    println!("\n2. Child logger with a source context:");
    let orders = logger.for_source("demo::orders");
    information!(orders, "Order {OrderId} placed", 1042)?;

    println!("\n3. Raising the level switch to Information:");
    switch.set_minimum_level(LogEventLevel::Information);
    debug!(logger, "Debug message (hidden)")?;
    information!(logger, "Info message (visible)")?;

    logger.flush()?;
    logger.dispose()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
