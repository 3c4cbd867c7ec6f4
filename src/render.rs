//! Render step
//!
//! After every tick the loop builds a `Frame` from the game state and hands it
//! to a `Renderer`. Drawing itself belongs to the host: a web page draws the
//! JSON form of the frame, the native runner just logs it.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GameEvent, GameState, Paddle, Score};

/// A paddle as the host draws it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub grabbed: bool,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            x: paddle.pos.x,
            y: paddle.pos.y,
            width: paddle.width,
            height: paddle.height,
            grabbed: paddle.grabbed,
        }
    }
}

/// Everything needed to draw one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub ball: Vec2,
    pub ball_radius: f32,
    pub left: PaddleView,
    pub right: PaddleView,
    pub score: Score,
    /// Ball is parked off-screen waiting to respawn
    pub resetting: bool,
    pub events: Vec<GameEvent>,
}

impl Frame {
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        Self {
            tick: state.time_ticks,
            ball: state.ball.pos,
            ball_radius: state.ball.radius,
            left: PaddleView::from(&state.left),
            right: PaddleView::from(&state.right),
            score: state.score,
            resetting: state.is_resetting,
            events,
        }
    }

    /// JSON encoding handed to web hosts
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Consumer of frames, called on the loop thread after every tick
pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> Renderer for F {
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// Renderer that reports the game through the log
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_score: Score,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame) {
        for event in &frame.events {
            log::debug!("tick {}: {:?}", frame.tick, event);
        }
        if frame.score != self.last_score {
            log::info!(
                "Score  {} : {}  (tick {})",
                frame.score.left,
                frame.score.right,
                frame.tick
            );
            self.last_score = frame.score;
        }
        log::trace!(
            "tick {} ball ({:.1}, {:.1}) paddles {:.1} / {:.1}",
            frame.tick,
            frame.ball.x,
            frame.ball.y,
            frame.left.y,
            frame.right.y
        );
    }
}
