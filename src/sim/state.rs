//! Bubble records and the field that owns them
//!
//! The field is a dense arena in storage order plus a handle-to-slot map, so
//! hosts address bubbles by [`BubbleId`] and never by position.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::geometry::PixelRect;

/// Stable handle issued when a bubble joins the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

impl std::fmt::Display for BubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation state of a single bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub(crate) id: BubbleId,
    /// Circle diameter in pixels, fixed for the bubble's lifetime
    pub(crate) diameter: i32,
    /// Screen-space bounding box (None until packed)
    pub(crate) bounds: Option<PixelRect>,
    /// Direction of travel (radians, periodic)
    pub(crate) heading: f64,
    /// Pixels per tick
    pub(crate) speed: i32,
    /// Creation speed that faster bubbles decay back toward
    pub(crate) baseline_speed: i32,
}

impl Bubble {
    /// A bubble that has not been laid out yet. Negative sizes and speeds clamp to zero.
    pub fn new(id: BubbleId, radius: i32, heading: f64, speed: i32) -> Self {
        let speed = speed.max(0);
        Self {
            id,
            diameter: radius.max(0).saturating_mul(2),
            bounds: None,
            heading,
            speed,
            baseline_speed: speed,
        }
    }

    pub fn id(&self) -> BubbleId {
        self.id
    }

    pub fn diameter(&self) -> i32 {
        self.diameter
    }

    pub fn radius(&self) -> i32 {
        self.diameter / 2
    }

    pub fn bounds(&self) -> Option<PixelRect> {
        self.bounds
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn baseline_speed(&self) -> i32 {
        self.baseline_speed
    }

    /// Drop one pixel per tick of any speed gained above the baseline
    pub(crate) fn decay_speed(&mut self) {
        if self.speed > self.baseline_speed {
            self.speed -= 1;
        }
    }
}

/// Ordered collection of bubbles for one layout generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BubbleField {
    bubbles: Vec<Bubble>,
    slots: HashMap<BubbleId, usize>,
}

impl BubbleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field in storage order. Later duplicates of an id are dropped.
    pub fn from_bubbles(bubbles: impl IntoIterator<Item = Bubble>) -> Self {
        let mut field = Self::new();
        for bubble in bubbles {
            field.push(bubble);
        }
        field
    }

    /// Append a bubble; returns false if its id is already present
    pub fn push(&mut self, bubble: Bubble) -> bool {
        if self.slots.contains_key(&bubble.id) {
            return false;
        }
        self.slots.insert(bubble.id, self.bubbles.len());
        self.bubbles.push(bubble);
        true
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Storage slot of a bubble
    pub fn slot_of(&self, id: BubbleId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.slot_of(id).map(|slot| &self.bubbles[slot])
    }

    pub(crate) fn get_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        let slot = self.slot_of(id)?;
        self.bubbles.get_mut(slot)
    }

    /// All bubbles in storage order
    pub fn as_slice(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter()
    }

    /// Number of unordered pairs whose circles currently overlap
    pub fn overlapping_pairs(&self) -> usize {
        let rects: Vec<PixelRect> = self.bubbles.iter().filter_map(|b| b.bounds).collect();
        let mut count = 0;
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if super::geometry::circles_overlap(&rects[i], &rects[j]) {
                    count += 1;
                }
            }
        }
        count
    }
}
