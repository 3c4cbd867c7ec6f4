//! Game settings
//!
//! Loaded from a JSON file on native builds, or handed over as a JSON string
//! by the web host. Anything missing falls back to the defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_ticks;
use crate::sim::{Playfield, Rules};

pub use crate::sim::SpeedPolicy;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Loop ===
    /// Milliseconds between ticks (20 = 50 Hz)
    pub tick_interval_ms: u64,
    /// Milliseconds between a score and the respawn
    pub reset_delay_ms: u64,

    // === Ball ===
    /// Initial velocity in pixels per tick
    pub serve_velocity: [f32; 2],
    /// Serve speed after a reset
    pub speed_policy: SpeedPolicy,
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,

    // === Headless runner ===
    /// Court size used when no host supplies one
    pub screen: [f32; 2],
    /// How many seconds the native runner plays before exiting (0 = forever)
    pub run_seconds: u64,

    // === Input ===
    /// Pending input commands buffered between ticks
    pub input_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            reset_delay_ms: RESET_DELAY_MS,

            serve_velocity: [SERVE_VELOCITY.0, SERVE_VELOCITY.1],
            speed_policy: SpeedPolicy::CarryForward,
            seed: None,

            screen: [400.0, 800.0],
            run_seconds: 10,

            input_capacity: 256,
        }
    }
}

impl Settings {
    /// Environment variable naming the settings file
    pub const PATH_ENV: &'static str = "DRAG_PONG_SETTINGS";
    /// Settings file used when the variable is unset
    const DEFAULT_PATH: &'static str = "drag_pong.json";

    /// Tick interval actually used; a zero interval runs at 1 ms
    pub fn effective_tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.max(1)
    }

    /// Simulation rules derived from these settings
    pub fn rules(&self) -> Rules {
        Rules {
            reset_delay_ticks: ms_to_ticks(self.reset_delay_ms, self.effective_tick_interval_ms()),
            speed_policy: self.speed_policy,
            serve_velocity: Vec2::from(self.serve_velocity),
        }
    }

    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.screen[0], self.screen[1])
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.effective_tick_interval_ms())
    }

    /// Parse settings from JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from `$DRAG_PONG_SETTINGS` or `drag_pong.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = std::env::var(Self::PATH_ENV).unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());
        Self::load_from(Path::new(&path))
    }
}
