//! Drag input
//!
//! Turns raw pointer drags into paddle grabs. A drag that starts on (or near)
//! a paddle holds it until the pointer is released; every move in between
//! sets the paddle's y, clamped to the court.

use glam::Vec2;

use crate::sim::{GameState, Side};

/// Identifies one pointer (mouse, or one finger of a multi-touch)
pub type PointerId = u32;

/// Extra slack around a paddle, in paddle widths, that still counts as a grab
pub const GRAB_MARGIN_WIDTHS: f32 = 2.0;

/// A paddle position produced by a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleMove {
    pub side: Side,
    /// Clamped paddle center y
    pub y: f32,
}

/// Tracks which pointer holds which paddle
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    grabs: Vec<(PointerId, Side)>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side held by `pointer`, if any
    pub fn grabbed_by(&self, pointer: PointerId) -> Option<Side> {
        self.grabs
            .iter()
            .find(|(p, _)| *p == pointer)
            .map(|(_, side)| *side)
    }

    /// Start a drag at `point`; grabs the first free paddle close enough to it
    pub fn begin(
        &mut self,
        pointer: PointerId,
        point: Vec2,
        state: &mut GameState,
    ) -> Option<PaddleMove> {
        // A pointer that never reported its release gives up its old paddle
        self.end(pointer, state);

        let side = [Side::Left, Side::Right].into_iter().find(|&side| {
            let paddle = state.paddle(side);
            let margin = Vec2::new(paddle.width * GRAB_MARGIN_WIDTHS, 0.0);
            !paddle.grabbed && paddle.contains_point(point, margin)
        })?;

        self.grabs.push((pointer, side));
        state.set_grabbed(side, true);
        log::debug!("Pointer {} grabbed {} paddle", pointer, side.as_str());

        state.drag_paddle(side, point.y);
        Some(PaddleMove {
            side,
            y: state.paddle(side).pos.y,
        })
    }

    /// Continue a drag; moves the held paddle, if any
    pub fn moved(
        &mut self,
        pointer: PointerId,
        point: Vec2,
        state: &mut GameState,
    ) -> Option<PaddleMove> {
        let side = self.grabbed_by(pointer)?;
        state.drag_paddle(side, point.y);
        Some(PaddleMove {
            side,
            y: state.paddle(side).pos.y,
        })
    }

    /// Finish a drag and release the held paddle
    pub fn end(&mut self, pointer: PointerId, state: &mut GameState) -> Option<Side> {
        let idx = self.grabs.iter().position(|(p, _)| *p == pointer)?;
        let (_, side) = self.grabs.remove(idx);
        state.set_grabbed(side, false);
        log::debug!("Pointer {} released {} paddle", pointer, side.as_str());
        Some(side)
    }

    /// Release every held paddle
    pub fn release_all(&mut self, state: &mut GameState) {
        for (_, side) in self.grabs.drain(..) {
            state.set_grabbed(side, false);
        }
    }
}
