//! Self-diagnostics channel
//!
//! Pipeline-internal failures (a sink returning an error, an enricher
//! panicking, a filter failing) are reported here rather than through the
//! logging pipeline itself. The channel is process-wide and disabled by
//! default; while disabled every write is a no-op.
//!
//! Writing never panics into the caller and never re-enters the pipeline:
//! messages produced while the output callback itself is running are
//! dropped, and a panicking callback is caught.
//!
//! # Example
//!
//! ```
//! use structured_logger::SelfLog;
//!
//! SelfLog::enable(|line: &str| eprintln!("{}", line));
//! // ... pipeline failures now show up on stderr
//! SelfLog::disable();
//! ```

use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

type Output = Arc<dyn Fn(&str) + Send + Sync>;

static OUTPUT: RwLock<Option<Output>> = parking_lot::const_rwlock(None);

thread_local! {
    static WRITING: Cell<bool> = const { Cell::new(false) };
}

/// Process-wide diagnostic output for the logging pipeline
pub struct SelfLog;

impl SelfLog {
    /// Install `output` as the diagnostic callback, replacing any previous one
    pub fn enable<F>(output: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        *OUTPUT.write() = Some(Arc::new(output));
    }

    /// Send diagnostics to standard error
    pub fn enable_stderr() {
        Self::enable(|line| {
            let _ = writeln!(std::io::stderr(), "{}", line);
        });
    }

    /// Remove the diagnostic callback
    pub fn disable() {
        *OUTPUT.write() = None;
    }

    pub fn is_enabled() -> bool {
        OUTPUT.read().is_some()
    }

    /// Write one timestamped diagnostic line if the channel is enabled
    pub fn write_line(args: fmt::Arguments<'_>) {
        // Clone the callback out so the lock is not held while it runs.
        let Some(output) = OUTPUT.read().clone() else {
            return;
        };

        if WRITING.with(|writing| writing.replace(true)) {
            return;
        }

        let line = format!(
            "{} {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            args
        );
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| output(&line)));

        WRITING.with(|writing| writing.set(false));
    }
}

/// Write a formatted line to [`SelfLog`]
#[macro_export]
macro_rules! self_log {
    ($($arg:tt)+) => {
        $crate::core::SelfLog::write_line(format_args!($($arg)+))
    };
}

/// Serializes tests that install a `SelfLog` callback
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

#[cfg(test)]
pub(crate) type CapturedLines = Arc<parking_lot::Mutex<Vec<String>>>;

/// Install a callback capturing lines written from the current thread only,
/// so concurrently running tests do not leak into each other's output
#[cfg(test)]
pub(crate) fn capture() -> (parking_lot::MutexGuard<'static, ()>, CapturedLines) {
    let guard = TEST_LOCK.lock();
    let lines: CapturedLines = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let owner = std::thread::current().id();
    SelfLog::enable(move |line| {
        if std::thread::current().id() == owner {
            sink.lock().push(line.to_string());
        }
    });
    (guard, lines)
}
