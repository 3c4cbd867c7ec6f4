//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here. Velocities are per tick,
//! not per second: the simulation is tied to the fixed loop cadence.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_ticks;

/// One side of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Screen dimensions plus the geometry derived from them
///
/// Sizes are not validated; a zero or negative screen gives degenerate
/// paddle ranges rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn paddle_width(&self) -> f32 {
        self.width * PADDLE_WIDTH_RATIO
    }

    #[inline]
    pub fn paddle_height(&self) -> f32 {
        self.height * PADDLE_HEIGHT_RATIO
    }

    #[inline]
    pub fn ball_radius(&self) -> f32 {
        self.width * BALL_SIZE_RATIO / 2.0
    }

    /// Legal range for a paddle's center y
    pub fn paddle_y_range(&self) -> (f32, f32) {
        let half = self.paddle_height() / 2.0;
        (half, self.height - half)
    }

    /// Clamp a raw input y into the legal paddle range
    ///
    /// Written as min(max(..)) rather than `f32::clamp`, which panics when
    /// the range is inverted on a degenerate screen.
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        let (lo, hi) = self.paddle_y_range();
        y.max(lo).min(hi)
    }

    /// Resting position of a paddle: two paddle widths in from its edge, vertically centered
    pub fn paddle_home(&self, side: Side) -> Vec2 {
        let inset = self.paddle_width() * 2.0;
        let x = match side {
            Side::Left => inset,
            Side::Right => self.width - inset,
        };
        Vec2::new(x, self.height / 2.0)
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Displacement applied each tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A player paddle, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Held by a drag input
    pub grabbed: bool,
}

impl Paddle {
    pub fn new(side: Side, playfield: &Playfield) -> Self {
        Self {
            side,
            pos: playfield.paddle_home(side),
            width: playfield.paddle_width(),
            height: playfield.paddle_height(),
            grabbed: false,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// Edge of the paddle that faces the court
    pub fn face_x(&self) -> f32 {
        match self.side {
            Side::Left => self.pos.x + self.width / 2.0,
            Side::Right => self.pos.x - self.width / 2.0,
        }
    }

    /// Whether `y` lies within the paddle's vertical extent (inclusive)
    #[inline]
    pub fn spans_y(&self, y: f32) -> bool {
        y >= self.top() && y <= self.bottom()
    }

    /// Whether `point` falls inside the paddle rectangle grown by `margin` on each side
    pub fn contains_point(&self, point: Vec2, margin: Vec2) -> bool {
        let half = Vec2::new(self.width, self.height) / 2.0 + margin;
        let d = (point - self.pos).abs();
        d.x <= half.x && d.y <= half.y
    }
}

/// Points per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// How the serve speed is chosen when the ball respawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPolicy {
    /// Reuse the speed the ball had when the reset was scheduled
    #[default]
    CarryForward,
    /// Always serve at the magnitude of the configured serve velocity
    Fixed,
}

/// Tunables the simulation reads every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    /// Ticks between a score and the respawn
    pub reset_delay_ticks: u32,
    pub speed_policy: SpeedPolicy,
    /// Velocity given to the ball by `initialize`
    pub serve_velocity: Vec2,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            reset_delay_ticks: ms_to_ticks(RESET_DELAY_MS, TICK_INTERVAL_MS),
            speed_policy: SpeedPolicy::CarryForward,
            serve_velocity: Vec2::new(SERVE_VELOCITY.0, SERVE_VELOCITY.1),
        }
    }
}

/// A respawn scheduled by a score, with its inputs captured at schedule time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRespawn {
    pub remaining_ticks: u32,
    /// Ball speed when the reset was scheduled
    pub speed: f32,
    /// Horizontal velocity when the reset was scheduled (picks the base angle)
    pub prev_vx: f32,
}

/// Something a tick did that the host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// `side` was awarded a point
    Scored { side: Side },
    PaddleHit { side: Side },
    WallHit,
    /// Ball returned to the center after a reset
    Respawned,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub rules: Rules,
    pub playfield: Playfield,
    /// Set once `initialize` has laid out the court
    pub initialized: bool,
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub score: Score,
    /// True from a score until the respawn; suppresses further scoring
    pub is_resetting: bool,
    pub pending_respawn: Option<PendingRespawn>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create an uninitialized game; call `initialize` before ticking
    pub fn new(seed: u64, rules: Rules) -> Self {
        let playfield = Playfield::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            playfield,
            initialized: false,
            ball: Ball::new(Vec2::ZERO, rules.serve_velocity, 0.0),
            left: Paddle::new(Side::Left, &playfield),
            right: Paddle::new(Side::Right, &playfield),
            score: Score::default(),
            is_resetting: false,
            pending_respawn: None,
            time_ticks: 0,
        }
    }

    /// Create a game already laid out on `playfield`
    pub fn with_playfield(seed: u64, rules: Rules, playfield: Playfield) -> Self {
        let mut state = Self::new(seed, rules);
        state.initialize(playfield);
        state
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
