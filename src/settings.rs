use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;

/// Longest accepted trend window, about ten years.
pub const MAX_WINDOW_DAYS: i64 = 3660;

/// Look-back windows for the weekly and daily trend deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendWindows {
    pub weekly_days: i64,
    pub daily_days: i64,
}

impl Default for TrendWindows {
    fn default() -> Self {
        Self {
            weekly_days: 7,
            daily_days: 1,
        }
    }
}

impl TrendWindows {
    /// Both windows must lie in `1..=MAX_WINDOW_DAYS`.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, days) in [("weekly", self.weekly_days), ("daily", self.daily_days)] {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(EngineError::InvalidWindow { name, days });
            }
        }
        Ok(())
    }

    pub(crate) fn weekly(&self) -> Duration {
        Duration::days(self.weekly_days)
    }

    pub(crate) fn daily(&self) -> Duration {
        Duration::days(self.daily_days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub trend: TrendWindows,
    /// Used when period history is too short to average.
    pub default_cycle_length_days: u32,
    pub default_period_length_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            trend: TrendWindows::default(),
            default_cycle_length_days: 28,
            default_period_length_days: 5,
        }
    }
}

impl EngineSettings {
    /// Parse settings saved by the app. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`EngineSettings::from_json`] but falls back to defaults on any error.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "ignoring saved settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.trend.validate()
    }
}
