//! Log event level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log event, totally ordered from `Verbose` to `Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum LogEventLevel {
    Verbose = 0,
    Debug = 1,
    #[default]
    Information = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl LogEventLevel {
    /// The lowest level; a threshold at this level is always enabled.
    pub const MINIMUM: LogEventLevel = LogEventLevel::Verbose;

    /// The highest level.
    pub const MAXIMUM: LogEventLevel = LogEventLevel::Fatal;

    pub const ALL: [LogEventLevel; 6] = [
        LogEventLevel::Verbose,
        LogEventLevel::Debug,
        LogEventLevel::Information,
        LogEventLevel::Warning,
        LogEventLevel::Error,
        LogEventLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogEventLevel::Verbose => "Verbose",
            LogEventLevel::Debug => "Debug",
            LogEventLevel::Information => "Information",
            LogEventLevel::Warning => "Warning",
            LogEventLevel::Error => "Error",
            LogEventLevel::Fatal => "Fatal",
        }
    }

    /// Three-letter upper-case abbreviation used by text output
    pub fn short_name(&self) -> &'static str {
        match self {
            LogEventLevel::Verbose => "VRB",
            LogEventLevel::Debug => "DBG",
            LogEventLevel::Information => "INF",
            LogEventLevel::Warning => "WRN",
            LogEventLevel::Error => "ERR",
            LogEventLevel::Fatal => "FTL",
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LogEventLevel::Verbose,
            1 => LogEventLevel::Debug,
            2 => LogEventLevel::Information,
            3 => LogEventLevel::Warning,
            4 => LogEventLevel::Error,
            _ => LogEventLevel::Fatal,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogEventLevel::Verbose => BrightBlack,
            LogEventLevel::Debug => Blue,
            LogEventLevel::Information => Green,
            LogEventLevel::Warning => Yellow,
            LogEventLevel::Error => Red,
            LogEventLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogEventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogEventLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VERBOSE" | "TRACE" | "VRB" => Ok(LogEventLevel::Verbose),
            "DEBUG" | "DBG" => Ok(LogEventLevel::Debug),
            "INFORMATION" | "INFO" | "INF" => Ok(LogEventLevel::Information),
            "WARNING" | "WARN" | "WRN" => Ok(LogEventLevel::Warning),
            "ERROR" | "ERR" => Ok(LogEventLevel::Error),
            "FATAL" | "FTL" => Ok(LogEventLevel::Fatal),
            _ => Err(format!("Invalid log event level: '{}'", s)),
        }
    }
}

/// Accepts the same spellings as `FromStr`
impl<'de> Deserialize<'de> for LogEventLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
