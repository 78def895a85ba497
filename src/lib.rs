//! Bubble Drift - a self-organizing floating bubble field
//!
//! Core modules:
//! - `sim`: Deterministic simulation (packing, motion, collisions, impulses)
//! - `engine`: Lifecycle facade owning the bubble field and its tick scheduler
//! - `scheduler`: Serial tick driver
//! - `settings`: Data-driven engine tuning
//! - `wasm`: Browser host binding (wasm32 only)

pub mod engine;
pub mod error;
pub mod scheduler;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use engine::{Engine, RenderedBubble};
pub use error::EngineError;
pub use scheduler::TickScheduler;
pub use settings::EngineSettings;

use glam::DVec2;

/// Engine configuration constants
pub mod consts {
    /// Gap between the seed bubble and every ring bubble (pixels)
    pub const DEFAULT_PADDING: i32 = 10;

    /// Angular step between consecutive ring placements (60 degrees)
    pub const PLACEMENT_STEP: f64 = std::f64::consts::TAU / 6.0;

    /// Delay between the end of one tick and the start of the next
    pub const TICK_INTERVAL_MS: u64 = 10;
    /// Maximum ticks a single host update may run before dropping the backlog
    pub const MAX_CATCH_UP_TICKS: u32 = 8;

    /// Slowest creation speed (pixels per tick)
    pub const DEFAULT_MIN_SPEED: i32 = 3;
    /// Fastest creation speed (pixels per tick)
    pub const DEFAULT_MAX_SPEED: i32 = 5;
    /// Slowest speed that moves a bubble at every heading. At 1 px/tick an
    /// off-axis step truncates to zero on both axes.
    pub const MIN_MOVING_SPEED: i32 = 2;

    /// Scales gesture velocity into simulation pixels per tick
    pub const IMPULSE_DIVISOR: f64 = 6.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
