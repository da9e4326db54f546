//! Playlist options
//!
//! Options are resolved by deep-merging caller overrides over the defaults.
//! Overrides can come straight from JSON, or from an optional config file
//! layered under `REEL_`-prefixed environment variables.

use crate::error::{PlaylistError, Result};
use crate::merge::deep_merge;
use crate::volume::Volume;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;

/// Environment prefix used by [`PlaylistOptions::load`]
pub const ENV_PREFIX: &str = "REEL";

/// Default delay before auto-advancing to the next track
pub const DEFAULT_AUTO_PLAY_DELAY_MS: u64 = 500;

/// Configuration for a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistOptions {
    /// Advance to the next track when one ends (default: true)
    pub auto_play_next: bool,

    /// Milliseconds to wait before auto-advancing (default: 500)
    pub auto_play_delay: u64,

    /// Initial output volume (default: 1.0)
    pub volume: Volume,

    /// Unrecognized keys, retained with no effect
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            auto_play_next: true,
            auto_play_delay: DEFAULT_AUTO_PLAY_DELAY_MS,
            volume: Volume::FULL,
            extra: Map::new(),
        }
    }
}

impl PlaylistOptions {
    /// Resolve options from a JSON object of overrides
    ///
    /// Known keys are accepted in camelCase (`autoPlayNext`) or snake_case
    /// (`auto_play_next`).
    pub fn from_overrides(overrides: Value) -> Result<Self> {
        let defaults = serde_json::to_value(Self::default())
            .map_err(|e| PlaylistError::Validation(e.to_string()))?;

        serde_json::from_value(deep_merge(defaults, canonicalize(overrides)))
            .map_err(|e| PlaylistError::Validation(format!("invalid playlist options: {e}")))
    }

    /// Load options from an optional file and `REEL_*` environment variables
    ///
    /// The file format is inferred from its extension and keys are written in
    /// snake_case (`auto_play_delay = 250`). Environment variables take
    /// precedence over the file, e.g. `REEL_AUTO_PLAY_DELAY=250`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`PlaylistOptions::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(true));
        }

        settings =
            settings.add_source(config::Environment::with_prefix(env_prefix).try_parsing(true));

        let overrides: Value = settings.build()?.try_deserialize()?;
        Self::from_overrides(overrides)
    }

    pub fn auto_play_delay_duration(&self) -> Duration {
        Duration::from_millis(self.auto_play_delay)
    }
}

/// Rewrite known keys to their camelCase spelling
///
/// Config sources lowercase keys, so `autoPlayNext` may arrive as
/// `autoplaynext` or `auto_play_next`.
fn canonicalize(overrides: Value) -> Value {
    let Value::Object(map) = overrides else {
        return overrides;
    };

    let canonical = map
        .into_iter()
        .map(|(key, value)| {
            let folded: String = key
                .chars()
                .filter(|c| *c != '_')
                .flat_map(char::to_lowercase)
                .collect();
            let key = match folded.as_str() {
                "autoplaynext" => "autoPlayNext".to_string(),
                "autoplaydelay" => "autoPlayDelay".to_string(),
                "volume" => "volume".to_string(),
                _ => key,
            };
            (key, value)
        })
        .collect();

    Value::Object(canonical)
}
