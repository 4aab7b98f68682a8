//! Closure-backed and in-memory sinks

use crate::core::{LogEvent, LogEventSink, Result};
use parking_lot::Mutex;

/// Sink that hands every event to a closure
///
/// # Example
///
/// ```
/// use structured_logger::sinks::DelegatingSink;
///
/// let sink = DelegatingSink::new(|event| {
///     println!("{}", event.render_message());
///     Ok(())
/// });
/// ```
pub struct DelegatingSink<F> {
    write: F,
}

impl<F> DelegatingSink<F>
where
    F: Fn(&LogEvent) -> Result<()> + Send + Sync,
{
    pub fn new(write: F) -> Self {
        Self { write }
    }
}

impl<F> LogEventSink for DelegatingSink<F>
where
    F: Fn(&LogEvent) -> Result<()> + Send + Sync,
{
    fn emit(&self, event: &LogEvent) -> Result<()> {
        (self.write)(event)
    }

    fn name(&self) -> &str {
        "delegating"
    }
}

/// Keeps a copy of every event it receives
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the events received so far
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// Rendered messages of the events received so far
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(LogEvent::render_message)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl LogEventSink for MemorySink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        self.events.lock().push(event.copy());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
