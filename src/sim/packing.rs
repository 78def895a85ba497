//! Initial radial packing
//!
//! The first bubble in placement order sits at the container center. Every
//! other bubble is placed on a ring around it, just clear of the seed bubble,
//! stepping 60 degrees per placement from a seed angle. Ring bubbles may still
//! overlap each other; the collision pass separates them once ticking starts.

use glam::IVec2;

use super::geometry::{PixelRect, point_at_angle};
use crate::consts::PLACEMENT_STEP;

/// Storage indices in the order they are placed.
///
/// With more than two bubbles, the first two keep their slots and the rest
/// are split into two halves that are interleaved, second half first.
pub fn placement_order(count: usize) -> Vec<usize> {
    if count <= 2 {
        return (0..count).collect();
    }

    let rest: Vec<usize> = (2..count).collect();
    let (first_half, second_half) = rest.split_at(rest.len() / 2);

    let mut order = Vec::with_capacity(count);
    order.extend([0, 1]);
    for i in 0..first_half.len().max(second_half.len()) {
        if let Some(&idx) = second_half.get(i) {
            order.push(idx);
        }
        if let Some(&idx) = first_half.get(i) {
            order.push(idx);
        }
    }
    order
}

/// Compute the initial bounds of every bubble, indexed by storage order.
///
/// `diameters` must already be largest-first. The container spans
/// `(0, 0)..(width, height)`.
pub fn pack(diameters: &[i32], width: i32, height: i32, padding: i32, seed_angle: f64) -> Vec<PixelRect> {
    let mut placed = vec![PixelRect::default(); diameters.len()];
    let order = placement_order(diameters.len());
    let Some((&seed_idx, ring)) = order.split_first() else {
        return placed;
    };

    let container_center = IVec2::new(width.max(0) / 2, height.max(0) / 2);
    let seed_diameter = diameters[seed_idx].max(0);
    let seed_rect = PixelRect::around(container_center, seed_diameter);
    placed[seed_idx] = seed_rect;

    let seed_center = IVec2::new(
        seed_rect.left + seed_rect.width() / 2,
        seed_rect.top + seed_rect.width() / 2,
    );
    let padding = padding.max(0);

    let mut angle = seed_angle;
    for &idx in ring {
        let diameter = diameters[idx].max(0);
        let radius = diameter / 2;
        angle += PLACEMENT_STEP;
        let distance = seed_rect.radius() + padding + radius;
        let center = point_at_angle(seed_center, distance, angle);
        placed[idx] = PixelRect::around(center, diameter);
    }

    log::debug!(
        "Packed {} bubbles around seed {:?} (seed angle {:.3})",
        diameters.len(),
        seed_center,
        seed_angle
    );
    placed
}
