//! Drag impulses reported by the host's gesture tracking

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::angle_between;
use super::state::Bubble;

/// One drag sample for a bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impulse {
    /// Bubble center when the sample was taken
    pub center: IVec2,
    /// Pointer movement since the previous sample
    pub delta: IVec2,
    /// Gesture speed in the host's units
    pub raw_velocity: f64,
}

impl Impulse {
    pub fn new(center: IVec2, delta: IVec2, raw_velocity: f64) -> Self {
        Self {
            center,
            delta,
            raw_velocity,
        }
    }

    /// Speed in pixels per tick after scaling down by `divisor`
    pub fn effective_velocity(&self, divisor: f64) -> f64 {
        self.raw_velocity / divisor
    }

    /// Direction of the drag
    pub fn heading(&self) -> f64 {
        let from = self.center.as_dvec2();
        angle_between(from, from + self.delta.as_dvec2())
    }
}

/// Redirect a bubble if the drag is faster than it is already moving.
///
/// Slower samples are ignored so that noisy tails of a flick do not undo it.
/// The new speed is capped at `max_speed`. Returns whether the bubble was
/// redirected.
pub fn apply_impulse(
    bubble: &mut Bubble,
    impulse: &Impulse,
    divisor: f64,
    max_speed: i32,
) -> bool {
    let velocity = impulse.effective_velocity(divisor);
    if velocity.is_nan() || velocity <= bubble.speed as f64 {
        return false;
    }
    let heading = impulse.heading();
    if !heading.is_finite() {
        return false;
    }
    bubble.heading = heading;
    bubble.speed = velocity.min(max_speed.max(bubble.speed) as f64) as i32;
    true
}
