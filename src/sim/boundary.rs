//! Container edge detection and inward correction

use glam::IVec2;

use super::geometry::{PixelRect, angle_between, reverse_angle};
use super::state::Bubble;

/// Averaged point on the container edges that `bounds` currently crosses.
///
/// Each crossed edge contributes the point on that edge nearest the bubble
/// center. Returns None when the bubble is fully inside.
pub fn contact_point(bounds: &PixelRect, container: &PixelRect) -> Option<IVec2> {
    let center = bounds.center();
    let mut total = IVec2::ZERO;
    let mut hits = 0;

    if container.left >= bounds.left {
        total += IVec2::new(container.left, center.y);
        hits += 1;
    }
    if container.top >= bounds.top {
        total += IVec2::new(center.x, container.top);
        hits += 1;
    }
    if container.right <= bounds.right {
        total += IVec2::new(container.right, center.y);
        hits += 1;
    }
    if container.bottom <= bounds.bottom {
        total += IVec2::new(center.x, container.bottom);
        hits += 1;
    }

    (hits > 0).then(|| total / hits)
}

/// Redirect a bubble that crosses the container edge.
///
/// A bubble whose center already left the container heads straight for the
/// contact point; one that only pokes out heads directly away from it.
/// Returns false when there is no contact (or no bounds yet).
pub fn contain(bubble: &mut Bubble, container: &PixelRect) -> bool {
    let Some(bounds) = bubble.bounds else {
        return false;
    };
    let Some(contact) = contact_point(&bounds, container) else {
        return false;
    };

    let toward_contact = angle_between(bounds.exact_center(), contact.as_dvec2());
    bubble.heading = if container.contains(bounds.center()) {
        reverse_angle(toward_contact)
    } else {
        toward_contact
    };
    bubble.decay_speed();
    true
}
