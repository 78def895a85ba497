//! Bubble Drift demo
//!
//! Lays out the demo labels as bubbles, lets them drift for a few seconds,
//! flicks one of them half way through and logs how the field settles.
//! Run with `RUST_LOG=info` (or `debug`/`trace` for more detail).

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::ops::ControlFlow;

    use bubble_drift::sim::{BubbleId, Impulse};
    use bubble_drift::{Engine, EngineSettings};
    use glam::IVec2;

    const LABELS: [&str; 7] = [
        "Hello Bubble",
        "Floating labels",
        "Rust",
        "Drift",
        "Packing",
        "Bubbles of different sizes",
        "Yo",
    ];

    /// Ticks to run (about five seconds at the default interval)
    const DEMO_TICKS: u64 = 500;

    /// Rough content radius for a label: half its text width plus padding
    fn label_radius(label: &str) -> i32 {
        label.chars().count() as i32 * 4 + 20
    }

    pub fn run() {
        let settings = match std::env::args().nth(1) {
            Some(path) => match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| EngineSettings::from_json(&json).map_err(|e| e.to_string()))
            {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Could not load settings from {}: {}", path, e);
                    return;
                }
            },
            None => EngineSettings::default(),
        };

        let mut engine = Engine::new(settings);
        let ids: Vec<(BubbleId, &str)> = LABELS
            .iter()
            .map(|&label| {
                let radius = label_radius(label);
                (engine.add_bubble(radius, radius as f64), label)
            })
            .collect();
        engine.layout(800, 600);

        let (flicked, flicked_label) = ids[ids.len() / 2];
        engine.run_blocking(|engine| {
            let ticks = engine.tick_count();

            if ticks == DEMO_TICKS / 2 {
                if let Some(bounds) = engine.bounds(flicked) {
                    let impulse = Impulse::new(bounds.center(), IVec2::new(12, -4), 90.0);
                    match engine.apply_impulse(flicked, impulse) {
                        Ok(applied) => log::info!("Flicked '{}': applied={}", flicked_label, applied),
                        Err(e) => log::warn!("Flick failed: {}", e),
                    }
                }
            }

            if ticks % 50 == 0 {
                log::info!(
                    "Tick {}: {} overlapping pairs",
                    ticks,
                    engine.overlapping_pairs()
                );
            }

            if ticks >= DEMO_TICKS {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        for (id, label) in &ids {
            if let Some(bounds) = engine.bounds(*id) {
                log::info!("'{}' at {:?} (r={})", label, bounds.center(), bounds.radius());
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Drift (native) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the engine through `bubble_drift::wasm::BubbleFieldHost`
}
