//! Per-source minimum level overrides

use super::filter::source_matches;
use super::level_switch::LoggingLevelSwitch;
use super::log_level::LogEventLevel;

/// Where a logger reads its minimum level from
#[derive(Debug, Clone)]
pub enum MinimumLevel {
    Fixed(LogEventLevel),
    Switch(LoggingLevelSwitch),
}

impl MinimumLevel {
    #[inline]
    pub fn current(&self) -> LogEventLevel {
        match self {
            MinimumLevel::Fixed(level) => *level,
            MinimumLevel::Switch(switch) => switch.minimum_level(),
        }
    }
}

impl Default for MinimumLevel {
    fn default() -> Self {
        MinimumLevel::Fixed(LogEventLevel::Information)
    }
}

/// Source-context prefixes mapped to level switches
///
/// Lookups pick the longest prefix that matches on a `.` or `::` boundary,
/// so `MyApp.Db` beats `MyApp` for a logger named `MyApp.Db.Pool`.
#[derive(Debug, Clone, Default)]
pub struct LevelOverrideMap {
    // kept sorted by descending prefix length
    overrides: Vec<(String, LoggingLevelSwitch)>,
}

impl LevelOverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the switch for `prefix`
    pub fn insert(&mut self, prefix: impl Into<String>, switch: LoggingLevelSwitch) {
        let prefix = prefix.into();
        self.overrides.retain(|(existing, _)| *existing != prefix);
        let at = self
            .overrides
            .iter()
            .position(|(existing, _)| existing.len() < prefix.len())
            .unwrap_or(self.overrides.len());
        self.overrides.insert(at, (prefix, switch));
    }

    /// Switch governing `source_context`, if any prefix matches
    pub fn lookup(&self, source_context: &str) -> Option<&LoggingLevelSwitch> {
        self.overrides
            .iter()
            .find(|(prefix, _)| source_matches(source_context, prefix))
            .map(|(_, switch)| switch)
    }

    /// Minimum level for a logger bound to `source_context`
    pub fn effective(&self, source_context: &str, fallback: &MinimumLevel) -> MinimumLevel {
        match self.lookup(source_context) {
            Some(switch) => MinimumLevel::Switch(switch.clone()),
            None => fallback.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
