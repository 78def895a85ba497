//! Engine tuning
//!
//! Loaded from JSON by hosts that expose bubble-field attributes; any field
//! left out takes its default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EngineError;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Packing ===
    /// Gap between the seed bubble and the ring around it (pixels)
    pub padding: i32,

    // === Motion ===
    /// Slowest creation speed (pixels per tick)
    pub min_speed: i32,
    /// Fastest creation speed (pixels per tick)
    pub max_speed: i32,
    /// Delay between ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Cap on ticks one host update may run
    pub max_catch_up_ticks: u32,

    // === Impulses ===
    /// Gesture velocity is divided by this before it is compared to bubble speed
    pub impulse_divisor: f64,

    // === Determinism ===
    /// RNG seed for layout and initial motion (None draws one at startup)
    pub seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,

            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            tick_interval_ms: TICK_INTERVAL_MS,
            max_catch_up_ticks: MAX_CATCH_UP_TICKS,

            impulse_divisor: IMPULSE_DIVISOR,

            seed: None,
        }
    }
}

impl EngineSettings {
    /// Settings with a fixed seed (reproducible layouts)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> String {
        // Infallible for a flat struct of numbers
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Clamp malformed values to something harmless instead of rejecting them
    pub fn sanitized(mut self) -> Self {
        self.padding = self.padding.max(0);
        self.min_speed = self.min_speed.max(MIN_MOVING_SPEED);
        self.max_speed = self.max_speed.max(MIN_MOVING_SPEED);
        if self.min_speed > self.max_speed {
            std::mem::swap(&mut self.min_speed, &mut self.max_speed);
        }
        self.tick_interval_ms = self.tick_interval_ms.max(1);
        self.max_catch_up_ticks = self.max_catch_up_ticks.max(1);
        if !self.impulse_divisor.is_finite() || self.impulse_divisor <= 0.0 {
            log::warn!(
                "Ignoring impulse divisor {}, using {}",
                self.impulse_divisor,
                IMPULSE_DIVISOR
            );
            self.impulse_divisor = IMPULSE_DIVISOR;
        }
        self
    }

    /// Tick interval as a duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.padding, 10);
        assert_eq!(settings.tick_interval(), Duration::from_millis(10));
        assert_eq!(settings.impulse_divisor, 6.0);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = EngineSettings::from_json(r#"{ "padding": 4, "seed": 7 }"#).unwrap();
        assert_eq!(settings.padding, 4);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.max_speed, DEFAULT_MAX_SPEED);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = EngineSettings::seeded(99);
        let back = EngineSettings::from_json(&settings.to_json()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_malformed_values_are_clamped() {
        let settings = EngineSettings::from_json(
            r#"{ "padding": -3, "min_speed": 9, "max_speed": 2, "tick_interval_ms": 0, "impulse_divisor": -1.0 }"#,
        )
        .unwrap();
        assert_eq!(settings.padding, 0);
        assert_eq!((settings.min_speed, settings.max_speed), (2, 9));
        assert_eq!(settings.tick_interval_ms, 1);
        assert_eq!(settings.impulse_divisor, IMPULSE_DIVISOR);
    }

    #[test]
    fn test_speeds_are_raised_to_moving_minimum() {
        let settings =
            EngineSettings::from_json(r#"{ "min_speed": 1, "max_speed": 0 }"#).unwrap();
        assert_eq!((settings.min_speed, settings.max_speed), (2, 2));

        let settings = EngineSettings::from_json(r#"{ "min_speed": -4, "max_speed": 6 }"#).unwrap();
        assert_eq!((settings.min_speed, settings.max_speed), (2, 6));
    }

    #[test]
    fn test_default_speeds_move_off_axis() {
        let settings = EngineSettings::default();
        assert!(settings.min_speed >= MIN_MOVING_SPEED);
        assert!(settings.min_speed <= settings.max_speed);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            EngineSettings::from_json("{ padding: }"),
            Err(EngineError::InvalidSettings(_))
        ));
    }
}
