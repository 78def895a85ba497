//! Bubble-to-bubble overlap detection and separation
//!
//! Resolution is batched: every overlapping bubble gets its new heading and
//! tentative bounds computed from the same snapshot, and only then are the
//! results written back. No bubble sees a half-updated neighbour.

use glam::{DVec2, IVec2};

use super::boundary::contact_point;
use super::geometry::{PixelRect, angle_between, circles_overlap, point_at_angle, reverse_angle};
use super::state::{Bubble, BubbleField};

/// Pending update for one bubble, produced by [`resolve_overlaps`]
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Storage slot of the bubble
    pub slot: usize,
    pub heading: f64,
    pub speed: i32,
    pub bounds: PixelRect,
}

/// Slots of every other bubble whose circle overlaps the bubble at `slot`.
///
/// Bubbles without bounds take no part.
pub fn overlapping(bubbles: &[Bubble], slot: usize) -> Vec<usize> {
    let Some(own) = bubbles.get(slot).and_then(|b| b.bounds) else {
        return Vec::new();
    };
    bubbles
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != slot)
        .filter_map(|(other, b)| b.bounds.map(|bounds| (other, bounds)))
        .filter(|(_, bounds)| circles_overlap(bounds, &own))
        .map(|(other, _)| other)
        .collect()
}

/// Centroid of the given bubbles' centers, truncated to whole pixels
pub fn cooperate_point(bubbles: &[Bubble], slots: &[usize]) -> Option<IVec2> {
    let centers: Vec<DVec2> = slots
        .iter()
        .filter_map(|&slot| bubbles.get(slot).and_then(|b| b.bounds))
        .map(|bounds| bounds.exact_center())
        .collect();
    if centers.is_empty() {
        return None;
    }
    let mean = centers.iter().sum::<DVec2>() / centers.len() as f64;
    Some(mean.as_ivec2())
}

/// Compute separation moves for every currently overlapping bubble.
///
/// Each bubble turns away from the centroid of what it overlaps (blended with
/// its boundary contact point if it is also crossing the container edge),
/// takes one tentative step along the new heading, and sheds one unit of any
/// boosted speed. Nothing is written; see [`commit`].
pub fn resolve_overlaps(bubbles: &[Bubble], container: &PixelRect) -> Vec<Resolution> {
    let mut resolutions = Vec::new();

    for (slot, bubble) in bubbles.iter().enumerate() {
        let Some(bounds) = bubble.bounds else {
            continue;
        };
        let others = overlapping(bubbles, slot);
        let Some(mut cooperate) = cooperate_point(bubbles, &others) else {
            continue;
        };
        if let Some(contact) = contact_point(&bounds, container) {
            cooperate = (cooperate + contact) / 2;
        }

        let heading = reverse_angle(angle_between(bounds.exact_center(), cooperate.as_dvec2()));
        if !heading.is_finite() {
            log::warn!("Bubble {} produced a non-finite separation heading", bubble.id);
            continue;
        }

        let mut decayed = bubble.clone();
        decayed.decay_speed();
        let center = point_at_angle(bounds.center(), bubble.speed, heading);

        resolutions.push(Resolution {
            slot,
            heading,
            speed: decayed.speed,
            bounds: PixelRect::around(center, bubble.diameter),
        });
    }

    resolutions
}

/// Write a batch of resolutions back into the field
pub fn commit(field: &mut BubbleField, resolutions: &[Resolution]) {
    let bubbles = field.as_mut_slice();
    for resolution in resolutions {
        if let Some(bubble) = bubbles.get_mut(resolution.slot) {
            bubble.heading = resolution.heading;
            bubble.speed = resolution.speed;
            bubble.bounds = Some(resolution.bounds);
        }
    }
}
