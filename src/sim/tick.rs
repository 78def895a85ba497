//! Fixed-interval motion step
//!
//! Advances every bubble once, in storage order. Boundary correction wins
//! over separation for a bubble; separation, when triggered, runs as one
//! batch over the whole field.

use super::boundary::{contact_point, contain};
use super::collision::{commit, overlapping, resolve_overlaps};
use super::geometry::{PixelRect, point_at_angle};
use super::state::{Bubble, BubbleField};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Bubbles that advanced
    pub moved: usize,
    /// Bubbles redirected by the container edge
    pub boundary_corrections: usize,
    /// Batched separation passes run
    pub separation_passes: usize,
    /// Bubbles held in place because their step could not be computed
    pub frozen: usize,
}

/// Advance the whole field by one tick.
///
/// Each bubble sheds at most one unit of boosted speed per tick, whether that
/// happens in the edge correction, a separation batch or the plain step.
pub fn tick(field: &mut BubbleField, container: &PixelRect) -> TickReport {
    let mut report = TickReport::default();
    let mut decayed = vec![false; field.len()];

    for slot in 0..field.len() {
        let (bounds, crowded) = {
            let bubbles = field.as_slice();
            let Some(bounds) = bubbles[slot].bounds else {
                continue;
            };
            (bounds, !overlapping(bubbles, slot).is_empty())
        };

        if contact_point(&bounds, container).is_some() {
            let bubble = &mut field.as_mut_slice()[slot];
            let speed = bubble.speed;
            contain(bubble, container);
            if decayed[slot] {
                bubble.speed = speed;
            }
            decayed[slot] = true;
            report.boundary_corrections += 1;
        } else if crowded {
            let mut resolutions = resolve_overlaps(field.as_slice(), container);
            for resolution in &mut resolutions {
                if decayed[resolution.slot] {
                    resolution.speed = field.as_slice()[resolution.slot].speed;
                }
                decayed[resolution.slot] = true;
            }
            commit(field, &resolutions);
            report.separation_passes += 1;
        }

        let bubble = &mut field.as_mut_slice()[slot];
        if advance(bubble) {
            report.moved += 1;
        } else {
            log::warn!("Bubble {} frozen this tick (heading {})", bubble.id, bubble.heading);
            report.frozen += 1;
        }
        if !decayed[slot] {
            bubble.decay_speed();
            decayed[slot] = true;
        }
    }

    log::trace!("Tick: {:?}", report);
    report
}

/// Move a bubble `speed` pixels along its heading, keeping its diameter
fn advance(bubble: &mut Bubble) -> bool {
    let Some(bounds) = bubble.bounds else {
        return false;
    };
    if !bubble.heading.is_finite() {
        return false;
    }
    let center = point_at_angle(bounds.center(), bubble.speed, bubble.heading);
    bubble.bounds = Some(PixelRect::around(center, bubble.diameter));
    true
}
