//! Deterministic simulation module
//!
//! All packing and motion logic lives here. This module must be pure and deterministic:
//! - Integer pixel positions only
//! - No randomness (callers pass seed angles, headings and speeds in)
//! - Stable iteration order (storage order)
//! - No rendering or platform dependencies

pub mod boundary;
pub mod collision;
pub mod geometry;
pub mod impulse;
pub mod packing;
pub mod state;
pub mod tick;

pub use boundary::{contact_point, contain};
pub use collision::{Resolution, commit, cooperate_point, overlapping, resolve_overlaps};
pub use geometry::{PixelRect, angle_between, circles_overlap, point_at_angle, reverse_angle};
pub use impulse::{Impulse, apply_impulse};
pub use packing::{pack, placement_order};
pub use state::{Bubble, BubbleField, BubbleId};
pub use tick::{TickReport, tick};
