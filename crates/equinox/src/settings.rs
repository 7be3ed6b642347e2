//! Editor settings read once at startup
//!
//! The settings file is a flat JSON object:
//!
//! ```json
//! { "maxFps": 144, "logLevel": "debug" }
//! ```
//!
//! Missing keys fall back to their defaults.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Config;

/// Frame-rate cap used when the settings file does not name one
pub const DEFAULT_MAX_FPS: u32 = 60;

/// Default file the editor reads its settings from
pub const SETTINGS_FILE: &str = "settings.json";

fn default_max_fps() -> u32 {
    DEFAULT_MAX_FPS
}

/// Accept any JSON number for `maxFps`, truncated and clamped to `u32`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deserialize_max_fps<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    // Saturating cast: negatives and NaN become 0, huge values u32::MAX
    Ok(value.trunc() as u32)
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Startup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Upper bound on frames per second, 0 disables the cap
    #[serde(default = "default_max_fps", deserialize_with = "deserialize_max_fps")]
    pub max_fps: u32,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_fps: DEFAULT_MAX_FPS,
            log_level: default_log_level(),
        }
    }
}

impl Config for Settings {}
