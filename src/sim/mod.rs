//! Fixed-step simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only (velocities are per tick)
//! - Seeded RNG only
//! - No rendering, threading or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{ball_paddle_overlap, ball_wall_contact, goal_scorer, reflect_x, reflect_y};
pub use state::{
    Ball, GameEvent, GameState, Paddle, PendingRespawn, Playfield, Rules, Score, Side, SpeedPolicy,
};
pub use tick::tick;
