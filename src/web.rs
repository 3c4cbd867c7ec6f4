//! Browser binding
//!
//! The page owns the canvas, the 20 ms interval and the pointer listeners;
//! it forwards them here and draws whatever frame `tick` returns.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::input::DragTracker;
use crate::render::Frame;
use crate::settings::Settings;
use crate::sim::{GameState, Playfield, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Drag Pong loaded");
}

/// One game, driven by the host page
#[wasm_bindgen]
pub struct WebPong {
    state: GameState,
    drags: DragTracker,
    settings: Settings,
}

#[wasm_bindgen]
impl WebPong {
    /// Create a game on a `width` x `height` court; `settings_json` may be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, settings_json: Option<String>) -> WebPong {
        let settings = settings_json
            .as_deref()
            .map(Settings::from_json)
            .unwrap_or_default();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("New game with seed {}", seed);

        let state = GameState::with_playfield(seed, settings.rules(), Playfield::new(width, height));
        WebPong {
            state,
            drags: DragTracker::new(),
            settings,
        }
    }

    /// Interval the page should call `tick` at
    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> u32 {
        u32::try_from(self.settings.effective_tick_interval_ms()).unwrap_or(u32::MAX)
    }

    /// Advance one tick and return the frame as JSON
    pub fn tick(&mut self) -> String {
        let events = tick(&mut self.state);
        Frame::capture(&self.state, events).to_json()
    }

    /// Current frame as JSON, without ticking
    pub fn frame(&self) -> String {
        Frame::capture(&self.state, Vec::new()).to_json()
    }

    /// Returns true if the pointer grabbed a paddle
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, pointer: u32, x: f32, y: f32) -> bool {
        self.drags
            .begin(pointer, Vec2::new(x, y), &mut self.state)
            .is_some()
    }

    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, pointer: u32, x: f32, y: f32) {
        self.drags.moved(pointer, Vec2::new(x, y), &mut self.state);
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self, pointer: u32) {
        self.drags.end(pointer, &mut self.state);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.initialize(Playfield::new(width, height));
    }

    #[wasm_bindgen(getter, js_name = leftScore)]
    pub fn left_score(&self) -> u32 {
        self.state.score.left
    }

    #[wasm_bindgen(getter, js_name = rightScore)]
    pub fn right_score(&self) -> u32 {
        self.state.score.right
    }
}
