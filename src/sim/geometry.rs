//! Integer pixel geometry for circular bubbles
//!
//! Bubbles live in screen space: a bubble is described by the square
//! bounding box of its circle, in whole pixels. Angles are radians measured
//! with `atan2`, so +y points down the screen.

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// Axis-aligned rectangle in whole pixels (left/top inclusive, right/bottom exclusive)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of the given size with its top-left corner at `(left, top)`
    pub fn from_origin(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(
            left,
            top,
            left.saturating_add(width),
            top.saturating_add(height),
        )
    }

    /// Square bounding box of a circle of `diameter` pixels centred on `center`
    pub fn around(center: IVec2, diameter: i32) -> Self {
        let half = diameter / 2;
        Self::from_origin(
            center.x.saturating_sub(half),
            center.y.saturating_sub(half),
            diameter,
            diameter,
        )
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Radius of the inscribed circle
    #[inline]
    pub fn radius(&self) -> i32 {
        self.width() / 2
    }

    /// Corner-to-corner length, truncated to whole pixels
    pub fn diagonal(&self) -> i32 {
        DVec2::new(self.width() as f64, self.height() as f64).length() as i32
    }

    /// Integer center, rounded toward the top-left
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Sub-pixel center
    #[inline]
    pub fn exact_center(&self) -> DVec2 {
        DVec2::new(
            (self.left as f64 + self.right as f64) * 0.5,
            (self.top as f64 + self.bottom as f64) * 0.5,
        )
    }

    /// Whether `point` lies inside (empty rectangles contain nothing)
    pub fn contains(&self, point: IVec2) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && point.x >= self.left
            && point.x < self.right
            && point.y >= self.top
            && point.y < self.bottom
    }
}

/// True when the circles inscribed in `a` and `b` touch or intersect
pub fn circles_overlap(a: &PixelRect, b: &PixelRect) -> bool {
    let d = (a.center() - b.center()).as_i64vec2();
    let reach = a.radius() as i64 + b.radius() as i64;
    d.x * d.x + d.y * d.y <= reach * reach
}

/// The point `distance` pixels from `origin` along `angle`, truncated to whole pixels
pub fn point_at_angle(origin: IVec2, distance: i32, angle: f64) -> IVec2 {
    let offset = polar_to_cartesian(distance as f64, angle);
    IVec2::new(
        origin.x.saturating_add(offset.x as i32),
        origin.y.saturating_add(offset.y as i32),
    )
}

/// Direction of travel from `from` to `to`
#[inline]
pub fn angle_between(from: DVec2, to: DVec2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Turn a heading around by half a circle.
///
/// Angles strictly above π are lowered, everything else is raised, so the
/// result for exactly π is 2π rather than 0. Callers treat headings as
/// periodic, and existing trajectories depend on this branch, so it is kept.
#[inline]
pub fn reverse_angle(angle: f64) -> f64 {
    if angle > std::f64::consts::PI {
        angle - std::f64::consts::PI
    } else {
        angle + std::f64::consts::PI
    }
}
