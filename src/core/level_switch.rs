//! Dynamically adjustable minimum level
//!
//! A [`LoggingLevelSwitch`] is a shared, mutable minimum level. Cloning a
//! switch yields another handle to the same cell, so a single switch can
//! control a logger, several restricted sinks and level-gated enrichers at
//! once. Reads are never cached: a change is observed by the very next event.

use super::log_level::LogEventLevel;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct LoggingLevelSwitch {
    minimum_level: Arc<AtomicU8>,
}

impl LoggingLevelSwitch {
    pub fn new(initial: LogEventLevel) -> Self {
        Self {
            minimum_level: Arc::new(AtomicU8::new(initial.as_u8())),
        }
    }

    /// Current minimum level
    #[inline]
    pub fn minimum_level(&self) -> LogEventLevel {
        LogEventLevel::from_u8(self.minimum_level.load(Ordering::Acquire))
    }

    /// Replace the minimum level; visible to every handle immediately
    #[inline]
    pub fn set_minimum_level(&self, level: LogEventLevel) {
        self.minimum_level.store(level.as_u8(), Ordering::Release);
    }

    /// True if an event at `level` passes this switch
    #[inline]
    pub fn is_enabled(&self, level: LogEventLevel) -> bool {
        level >= self.minimum_level()
    }

    /// True if both handles share the same cell
    pub fn same_switch(&self, other: &LoggingLevelSwitch) -> bool {
        Arc::ptr_eq(&self.minimum_level, &other.minimum_level)
    }
}

impl Default for LoggingLevelSwitch {
    fn default() -> Self {
        Self::new(LogEventLevel::Information)
    }
}

impl fmt::Debug for LoggingLevelSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingLevelSwitch")
            .field("minimum_level", &self.minimum_level())
            .finish()
    }
}
