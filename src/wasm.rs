//! Browser host binding
//!
//! The page owns the DOM elements and the animation frame loop; it feeds
//! elapsed time and drag samples in and reads bounds back out after every
//! update.

use std::time::Duration;

use glam::IVec2;
use wasm_bindgen::prelude::*;

use crate::engine::Engine;
use crate::settings::EngineSettings;
use crate::sim::{BubbleId, Impulse};

/// Install the console logger and panic hook. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialised on repeat calls
    let _ = console_log::init_with_level(log::Level::Info);
}

/// One bubble field bound to a page container
#[wasm_bindgen]
pub struct BubbleFieldHost {
    engine: Engine,
}

#[wasm_bindgen]
impl BubbleFieldHost {
    /// Create a host from settings JSON (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<BubbleFieldHost, JsError> {
        let settings = if settings_json.trim().is_empty() {
            EngineSettings::default()
        } else {
            EngineSettings::from_json(settings_json)?
        };
        Ok(Self {
            engine: Engine::new(settings),
        })
    }

    /// Add a bubble; returns its handle
    #[wasm_bindgen(js_name = addBubble)]
    pub fn add_bubble(&mut self, radius: i32, ordering_hint: f64) -> u32 {
        self.engine.add_bubble(radius, ordering_hint).0
    }

    #[wasm_bindgen(js_name = removeBubble)]
    pub fn remove_bubble(&mut self, id: u32) -> Result<(), JsError> {
        self.engine.remove_bubble(BubbleId(id))?;
        Ok(())
    }

    /// Container measured or resized
    pub fn layout(&mut self, width: i32, height: i32) {
        self.engine.layout(width, height);
    }

    /// Container attached (after `layout`)
    pub fn start(&mut self) {
        self.engine.start();
    }

    /// Pause ticking without losing positions
    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Container detached; positions are discarded until the next layout
    pub fn detach(&mut self) {
        self.engine.teardown();
    }

    /// Advance by `elapsed_ms` of wall time; returns the ticks run
    pub fn update(&mut self, elapsed_ms: f64) -> u32 {
        let elapsed_ms = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
        let elapsed = Duration::from_secs_f64(elapsed_ms / 1000.0);
        self.engine.update(elapsed)
    }

    /// Report a drag sample; returns whether it redirected the bubble
    pub fn impulse(
        &mut self,
        id: u32,
        center_x: i32,
        center_y: i32,
        delta_x: i32,
        delta_y: i32,
        raw_velocity: f64,
    ) -> Result<bool, JsError> {
        let impulse = Impulse::new(
            IVec2::new(center_x, center_y),
            IVec2::new(delta_x, delta_y),
            raw_velocity,
        );
        Ok(self.engine.apply_impulse(BubbleId(id), impulse)?)
    }

    /// Flat `[id, left, top, right, bottom, ...]` for every placed bubble
    pub fn bounds(&self) -> Vec<i32> {
        let snapshot = self.engine.snapshot();
        bytemuck::cast_slice::<_, i32>(snapshot.as_slice()).to_vec()
    }
}
