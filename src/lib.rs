//! Drag Pong - a two-paddle ball-bouncing game core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (ball, paddles, score, collisions, reset cycle)
//! - `input`: Drag tracking that turns pointer events into paddle grabs and moves
//! - `render`: Per-tick frame snapshots and the renderer seam
//! - `runtime`: Threaded 50 Hz game loop with channel-based input
//! - `settings`: JSON configuration

pub mod input;
pub mod render;
pub mod runtime;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{DragTracker, PaddleMove, PointerId};
pub use render::{Frame, LogRenderer, Renderer};
pub use runtime::{Command, GameLoop, InputSender, LoopHandle};
pub use settings::{Settings, SpeedPolicy};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tick interval of the game loop in milliseconds (50 Hz)
    pub const TICK_INTERVAL_MS: u64 = 20;
    /// Delay between a score and the ball respawning
    pub const RESET_DELAY_MS: u64 = 1000;

    /// Paddle width as a fraction of screen width
    pub const PADDLE_WIDTH_RATIO: f32 = 0.02;
    /// Paddle height as a fraction of screen height
    pub const PADDLE_HEIGHT_RATIO: f32 = 0.2;
    /// Ball diameter as a fraction of screen width
    pub const BALL_SIZE_RATIO: f32 = 0.04;

    /// Serve velocity in pixels per tick
    pub const SERVE_VELOCITY: (f32, f32) = (10.0, 10.0);
    /// Where the ball is parked while a reset is pending
    pub const OFFSCREEN: (f32, f32) = (-100.0, -100.0);
    /// Half-width of the random respawn angle window (45 degrees)
    pub const RESPAWN_SPREAD: f32 = std::f32::consts::FRAC_PI_4;
}

/// Sentinel position used to hide the ball between a score and the respawn
#[inline]
pub fn offscreen() -> Vec2 {
    Vec2::new(consts::OFFSCREEN.0, consts::OFFSCREEN.1)
}

/// Build a velocity of the given magnitude pointing along `angle`
#[inline]
pub fn velocity_from_angle(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(speed * angle.cos(), speed * angle.sin())
}

/// Tick count that covers `ms` milliseconds at `interval_ms` per tick (at least one)
#[inline]
pub fn ms_to_ticks(ms: u64, interval_ms: u64) -> u32 {
    if interval_ms == 0 {
        return 1;
    }
    u32::try_from(ms.div_ceil(interval_ms).max(1)).unwrap_or(u32::MAX)
}
