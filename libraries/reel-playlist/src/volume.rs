//! Linear output volume
//!
//! The device takes a linear gain in `[0.0, 1.0]`, the same scale as a native
//! audio element's `volume` property. No perceptual curve is applied here.

use crate::error::{PlaylistError, Result};
use serde::{Deserialize, Serialize};

/// Validated volume level in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Volume(f64);

impl Volume {
    pub const MUTED: Volume = Volume(0.0);
    pub const FULL: Volume = Volume(1.0);

    /// Create a volume level
    ///
    /// Fails with [`PlaylistError::Validation`] for NaN, infinities, and
    /// anything outside `[0.0, 1.0]`.
    pub fn new(level: f64) -> Result<Self> {
        if !level.is_finite() || !(0.0..=1.0).contains(&level) {
            return Err(PlaylistError::Validation(format!(
                "volume must be a number between 0 and 1, got {level}"
            )));
        }
        Ok(Self(level))
    }

    /// Current level as a linear gain
    pub fn level(self) -> f64 {
        self.0
    }

    pub fn is_muted(self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<f64> for Volume {
    type Error = PlaylistError;

    fn try_from(level: f64) -> Result<Self> {
        Self::new(level)
    }
}

impl From<Volume> for f64 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}
