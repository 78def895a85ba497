//! Bubble field engine
//!
//! Owns the member list, the simulation field for the current layout
//! generation, the container geometry and the tick scheduler. Hosts talk to
//! bubbles only through [`BubbleId`] handles.

use std::ops::ControlFlow;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::EngineError;
use crate::scheduler::TickScheduler;
use crate::settings::EngineSettings;
use crate::sim::{
    Bubble, BubbleField, BubbleId, Impulse, PixelRect, TickReport, apply_impulse, pack, tick,
};

/// A bubble as the engine was told about it
#[derive(Debug, Clone, Copy, PartialEq)]
struct Member {
    id: BubbleId,
    radius: i32,
    ordering_hint: f64,
}

/// Renderer-facing record of one bubble's current bounds
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RenderedBubble {
    pub id: u32,
    pub bounds: PixelRect,
}

/// The packing-and-motion engine for one container
pub struct Engine {
    settings: EngineSettings,
    members: Vec<Member>,
    field: BubbleField,
    container: Option<PixelRect>,
    scheduler: TickScheduler,
    rng: Pcg32,
    next_id: u32,
    generation: u64,
    tick_count: u64,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Bubble engine seeded with {}", seed);
        Self {
            scheduler: TickScheduler::new(settings.tick_interval(), settings.max_catch_up_ticks),
            settings,
            members: Vec::new(),
            field: BubbleField::new(),
            container: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            generation: 0,
            tick_count: 0,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Add a bubble of the given content radius.
    ///
    /// Members stay sorted by descending `ordering_hint`; the new bubble goes
    /// in front of the first member with a smaller hint. Relayouts if the
    /// container is already known.
    pub fn add_bubble(&mut self, radius: i32, ordering_hint: f64) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;

        let member = Member {
            id,
            radius: radius.max(0),
            ordering_hint,
        };
        let at = self
            .members
            .iter()
            .position(|m| ordering_hint > m.ordering_hint)
            .unwrap_or(self.members.len());
        self.members.insert(at, member);

        self.relayout_if_measured();
        id
    }

    /// Remove a bubble. Relayouts if the container is already known.
    pub fn remove_bubble(&mut self, id: BubbleId) -> Result<(), EngineError> {
        let at = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(EngineError::UnknownBubble(id))?;
        self.members.remove(at);
        self.relayout_if_measured();
        Ok(())
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Measure the container and rebuild the field from scratch.
    ///
    /// Every bubble gets a fresh heading and speed, and the whole set is
    /// packed around the container center.
    pub fn layout(&mut self, width: i32, height: i32) {
        let container = PixelRect::from_origin(0, 0, width.max(0), height.max(0));
        self.container = Some(container);

        let seed_angle = self.rng.random_range(0.0..std::f64::consts::TAU);
        let (min_speed, max_speed) = (self.settings.min_speed, self.settings.max_speed);

        let mut bubbles: Vec<Bubble> = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let heading = self.rng.random_range(0.0..std::f64::consts::TAU);
            let speed = self.rng.random_range(min_speed..=max_speed);
            bubbles.push(Bubble::new(member.id, member.radius, heading, speed));
        }

        let diameters: Vec<i32> = bubbles.iter().map(Bubble::diameter).collect();
        let placed = pack(
            &diameters,
            container.width(),
            container.height(),
            self.settings.padding,
            seed_angle,
        );
        for (bubble, bounds) in bubbles.iter_mut().zip(placed) {
            bubble.bounds = Some(bounds);
        }

        self.field = BubbleField::from_bubbles(bubbles);
        self.generation += 1;
        log::info!(
            "Layout #{}: {} bubbles in {}x{} ({} overlapping pairs)",
            self.generation,
            self.field.len(),
            container.width(),
            container.height(),
            self.field.overlapping_pairs()
        );
    }

    fn relayout_if_measured(&mut self) {
        if let Some(container) = self.container {
            self.layout(container.width(), container.height());
        }
    }

    pub fn container(&self) -> Option<PixelRect> {
        self.container
    }

    /// Number of layout passes so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin ticking. Starting a running engine does nothing.
    pub fn start(&mut self) {
        if self.scheduler.start() {
            log::info!("Bubble engine started ({:?} ticks)", self.scheduler.interval());
        }
    }

    /// Stop ticking. Safe to call at any time.
    pub fn stop(&mut self) {
        if self.scheduler.stop() {
            log::info!("Bubble engine stopped after {} ticks", self.tick_count);
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Container torn down: stop ticking and discard the current layout.
    ///
    /// Members are kept, so measuring a new container brings them back.
    pub fn teardown(&mut self) {
        self.stop();
        self.field = BubbleField::new();
        self.container = None;
    }

    /// Feed wall time to the scheduler and run every tick that became due
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        let due = self.scheduler.advance(elapsed);
        for _ in 0..due {
            self.step();
        }
        due
    }

    /// Run one motion step immediately, regardless of the scheduler
    pub fn step(&mut self) -> TickReport {
        let Some(container) = self.container else {
            return TickReport::default();
        };
        self.tick_count += 1;
        tick(&mut self.field, &container)
    }

    /// Tick, wait one interval, tick again, until stopped.
    ///
    /// `between_ticks` runs on this thread after every tick; it is where the
    /// host delivers impulses. Returning `Break` stops the engine.
    pub fn run_blocking<F>(&mut self, mut between_ticks: F)
    where
        F: FnMut(&mut Engine) -> ControlFlow<()>,
    {
        self.start();
        while self.is_running() {
            std::thread::sleep(self.scheduler.interval());
            if self.update(self.scheduler.interval()) == 0 {
                continue;
            }
            if between_ticks(self).is_break() {
                self.stop();
            }
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Deliver a drag impulse. Returns whether it redirected the bubble.
    ///
    /// A flick never moves a bubble further than the container diagonal per tick.
    pub fn apply_impulse(&mut self, id: BubbleId, impulse: Impulse) -> Result<bool, EngineError> {
        let divisor = self.settings.impulse_divisor;
        let max_speed = self.container.map_or(0, |c| c.diagonal());
        let bubble = self.field.get_mut(id).ok_or(EngineError::UnknownBubble(id))?;
        let applied = apply_impulse(bubble, &impulse, divisor, max_speed);
        if applied {
            log::debug!(
                "Impulse on {}: heading {:.3}, speed {}",
                id,
                bubble.heading(),
                bubble.speed()
            );
        }
        Ok(applied)
    }

    /// Current bounds of a bubble (None before the first layout)
    pub fn bounds(&self, id: BubbleId) -> Option<PixelRect> {
        self.field.get(id).and_then(Bubble::bounds)
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.field.get(id)
    }

    /// Bubbles of the current layout in storage order
    pub fn bubbles(&self) -> &[Bubble] {
        self.field.as_slice()
    }

    /// Bounds of every placed bubble, ready for a renderer upload
    pub fn snapshot(&self) -> Vec<RenderedBubble> {
        self.field
            .iter()
            .filter_map(|b| {
                b.bounds().map(|bounds| RenderedBubble {
                    id: b.id().0,
                    bounds,
                })
            })
            .collect()
    }

    pub fn overlapping_pairs(&self) -> usize {
        self.field.overlapping_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    /// Content radii of the demo labels, largest first
    const DEMO_RADII: [i32; 7] = [96, 78, 66, 52, 40, 34, 22];

    fn demo_engine(seed: u64) -> (Engine, Vec<BubbleId>) {
        let mut engine = Engine::new(EngineSettings::seeded(seed));
        let ids = DEMO_RADII
            .iter()
            .map(|&r| engine.add_bubble(r, r as f64))
            .collect();
        (engine, ids)
    }

    #[test]
    fn test_add_keeps_largest_first() {
        let mut engine = Engine::new(EngineSettings::seeded(1));
        let small = engine.add_bubble(10, 10.0);
        let large = engine.add_bubble(50, 50.0);
        let tie = engine.add_bubble(30, 10.0);
        let mid = engine.add_bubble(20, 20.0);
        engine.layout(400, 400);

        let order: Vec<BubbleId> = engine.bubbles().iter().map(Bubble::id).collect();
        assert_eq!(order, vec![large, mid, small, tie]);
    }

    #[test]
    fn test_layout_centers_largest_bubble() {
        let (mut engine, ids) = demo_engine(7);
        engine.layout(800, 600);

        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.bounds(ids[0]).map(|b| b.center()), Some(IVec2::new(400, 300)));
        for (id, radius) in ids.iter().zip(DEMO_RADII) {
            let bubble = engine.bubble(*id).unwrap();
            assert_eq!(bubble.radius(), radius);
            let settings = engine.settings();
            assert!(bubble.speed() >= settings.min_speed && bubble.speed() <= settings.max_speed);
            assert_eq!(bubble.speed(), bubble.baseline_speed());
        }
    }

    #[test]
    fn test_same_seed_same_motion() {
        let (mut a, _) = demo_engine(42);
        let (mut b, _) = demo_engine(42);
        a.layout(800, 600);
        b.layout(800, 600);
        for _ in 0..100 {
            a.step();
            b.step();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_membership_change_relayouts() {
        let (mut engine, ids) = demo_engine(3);
        engine.layout(800, 600);
        let extra = engine.add_bubble(200, 200.0);
        assert_eq!(engine.generation(), 2);
        // the new largest bubble is now the seed
        assert_eq!(engine.bounds(extra).map(|b| b.center()), Some(IVec2::new(400, 300)));

        engine.remove_bubble(ids[3]).unwrap();
        assert_eq!(engine.generation(), 3);
        assert!(engine.bounds(ids[3]).is_none());
        assert_eq!(engine.bubbles().len(), DEMO_RADII.len());

        assert!(matches!(
            engine.remove_bubble(ids[3]),
            Err(EngineError::UnknownBubble(_))
        ));
    }

    #[test]
    fn test_no_layout_until_measured() {
        let (mut engine, ids) = demo_engine(3);
        assert_eq!(engine.generation(), 0);
        assert!(engine.bounds(ids[0]).is_none());
        assert_eq!(engine.step(), TickReport::default());
        assert_eq!(engine.tick_count(), 0);
    }

    #[test]
    fn test_update_follows_scheduler() {
        let (mut engine, _) = demo_engine(5);
        engine.layout(800, 600);
        assert_eq!(engine.update(Duration::from_millis(50)), 0);

        engine.start();
        engine.start();
        assert_eq!(engine.update(Duration::from_millis(10)), 1);
        assert_eq!(engine.update(Duration::from_millis(25)), 2);
        assert_eq!(engine.tick_count(), 3);

        engine.stop();
        engine.stop();
        assert_eq!(engine.update(Duration::from_millis(100)), 0);
        assert_eq!(engine.tick_count(), 3);
    }

    #[test]
    fn test_ticks_preserve_radius_and_membership() {
        let (mut engine, ids) = demo_engine(11);
        engine.layout(800, 600);
        for _ in 0..500 {
            engine.step();
        }
        assert_eq!(engine.snapshot().len(), ids.len());
        for (id, radius) in ids.iter().zip(DEMO_RADII) {
            let bounds = engine.bounds(*id).unwrap();
            assert_eq!(bounds.width(), radius * 2);
            assert_eq!(bounds.height(), radius * 2);
        }
    }

    #[test]
    fn test_teardown_discards_layout() {
        let (mut engine, ids) = demo_engine(8);
        engine.layout(800, 600);
        engine.start();
        engine.teardown();

        assert!(!engine.is_running());
        assert!(engine.container().is_none());
        assert!(engine.bubbles().is_empty());
        assert_eq!(engine.member_count(), ids.len());
        assert_eq!(engine.step(), TickReport::default());

        engine.layout(640, 480);
        assert_eq!(engine.bubbles().len(), ids.len());
        assert_eq!(engine.bounds(ids[0]).map(|b| b.center()), Some(IVec2::new(320, 240)));
    }

    #[test]
    fn test_impulse_through_engine() {
        let (mut engine, ids) = demo_engine(9);
        engine.layout(800, 600);
        let speed = engine.bubble(ids[2]).unwrap().speed();

        let center = engine.bounds(ids[2]).unwrap().center();
        let slow = Impulse::new(center, IVec2::new(5, 0), (speed * 6) as f64);
        assert!(!engine.apply_impulse(ids[2], slow).unwrap());

        let fast = Impulse::new(center, IVec2::new(0, -5), 120.0);
        assert!(engine.apply_impulse(ids[2], fast).unwrap());
        let bubble = engine.bubble(ids[2]).unwrap();
        assert_eq!(bubble.speed(), 20);
        assert!((bubble.heading() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        assert!(matches!(
            engine.apply_impulse(BubbleId(999), fast),
            Err(EngineError::UnknownBubble(BubbleId(999)))
        ));
    }

    #[test]
    fn test_flick_speed_is_capped_by_container() {
        let (mut engine, ids) = demo_engine(9);
        engine.layout(800, 600);
        let center = engine.bounds(ids[1]).unwrap().center();

        let wild = Impulse::new(center, IVec2::new(3, 1), 1e12);
        assert!(engine.apply_impulse(ids[1], wild).unwrap());
        assert_eq!(engine.bubble(ids[1]).unwrap().speed(), 1000);

        engine.step();
        let bounds = engine.bounds(ids[1]).unwrap();
        // at most a separation step and a plain step of 1000 px each
        assert!(bounds.left.abs() < 3000 && bounds.top.abs() < 3000, "{bounds:?}");
    }

    #[test]
    fn test_crowded_layout_separates() {
        // 20 bubbles of radius 20..=40 all packed on one ring
        for seed in 1..=6 {
            let mut engine = Engine::new(EngineSettings::seeded(seed));
            for i in 0..20 {
                let radius = 20 + (i * 7) % 21;
                engine.add_bubble(radius, radius as f64);
            }
            engine.layout(1200, 1200);
            assert!(engine.overlapping_pairs() > 0);

            let mut ticks = 0;
            while engine.overlapping_pairs() > 0 && ticks < 500 {
                engine.step();
                ticks += 1;
            }
            assert_eq!(
                engine.overlapping_pairs(),
                0,
                "seed {seed}: still overlapping after {ticks} ticks"
            );
        }
    }

    #[test]
    fn test_run_blocking_stops_on_break() {
        let mut settings = EngineSettings::seeded(2);
        settings.tick_interval_ms = 1;
        let mut engine = Engine::new(settings);
        engine.add_bubble(20, 1.0);
        engine.layout(200, 200);

        let mut calls = 0;
        engine.run_blocking(|_| {
            calls += 1;
            if calls == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(calls, 3);
        assert_eq!(engine.tick_count(), 3);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_snapshot_is_plain_data() {
        let (mut engine, _) = demo_engine(4);
        engine.layout(800, 600);
        let snapshot = engine.snapshot();
        let words: &[i32] = bytemuck::cast_slice(snapshot.as_slice());
        assert_eq!(words.len(), snapshot.len() * 5);
        assert_eq!(words[0] as u32, snapshot[0].id);
        assert_eq!(words[1], snapshot[0].bounds.left);
    }
}
