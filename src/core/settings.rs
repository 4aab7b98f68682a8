//! Deserializable logger settings
//!
//! Mirrors the usual `minimum_level` / `level_switches` / `properties`
//! layout of a logging section in an application config file. Loading the
//! file is left to the application; these types only describe its content.
//!
//! ```
//! use structured_logger::{LoggerConfiguration, LoggerSettings};
//!
//! let settings: LoggerSettings = serde_json::from_str(r#"{
//!     "level_switches": { "$controlSwitch": "Verbose" },
//!     "minimum_level": {
//!         "default": "Information",
//!         "override": { "my_app::db": "$controlSwitch", "hyper": "Warning" }
//!     },
//!     "properties": { "Application": "billing" }
//! }"#).unwrap();
//!
//! let logger = LoggerConfiguration::new()
//!     .apply_settings(&settings)
//!     .create_logger()
//!     .unwrap();
//! ```

use super::log_level::LogEventLevel;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Named switches and their initial level (`Information` when null or empty)
    #[serde(deserialize_with = "deserialize_switch_levels")]
    pub level_switches: BTreeMap<String, Option<LogEventLevel>>,
    pub minimum_level: Option<MinimumLevelSettings>,
    /// Properties attached to every event
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// `"minimum_level": "Debug"` or the detailed object form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinimumLevelSettings {
    Level(LogEventLevel),
    Detailed {
        #[serde(default)]
        default: Option<LogEventLevel>,
        /// Name of a declared level switch
        #[serde(default)]
        controlled_by: Option<String>,
        /// Source prefix to a level or a declared switch name
        #[serde(default, rename = "override")]
        overrides: BTreeMap<String, String>,
    },
}

impl LoggerSettings {
    /// Switch names are an optional `$`, a letter, then letters or digits
    pub fn is_valid_switch_name(name: &str) -> bool {
        let body = name.strip_prefix('$').unwrap_or(name);
        let mut chars = body.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
            _ => false,
        }
    }
}

fn deserialize_switch_levels<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Option<LogEventLevel>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, level)| {
            let level = match level.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(text) => Some(text.parse().map_err(de::Error::custom)?),
            };
            Ok((name, level))
        })
        .collect()
}
