//! Boundary and paddle checks
//!
//! All four checks are axis-aligned and stateless. Response is a plain
//! reflection: negate one velocity component, leave position alone.

use glam::Vec2;

use super::state::{Ball, Paddle, Playfield, Side};

/// Which side earns a point if the ball has reached a goal line
///
/// The left line belongs to the right player and vice versa. The two
/// conditions cannot both hold for a ball narrower than the court.
pub fn goal_scorer(ball: &Ball, playfield: &Playfield) -> Option<Side> {
    if ball.pos.x <= ball.radius {
        Some(Side::Right)
    } else if ball.pos.x >= playfield.width - ball.radius {
        Some(Side::Left)
    } else {
        None
    }
}

/// Whether the ball overlaps the court-facing edge of `paddle`
///
/// Only the face and the vertical extent are checked, so a ball that ends up
/// behind a paddle keeps registering hits.
pub fn ball_paddle_overlap(ball: &Ball, paddle: &Paddle) -> bool {
    let crossed = match paddle.side {
        Side::Left => ball.pos.x <= paddle.face_x() + ball.radius,
        Side::Right => ball.pos.x >= paddle.face_x() - ball.radius,
    };
    crossed && paddle.spans_y(ball.pos.y)
}

/// Whether the ball touches the top or bottom wall
pub fn ball_wall_contact(ball: &Ball, playfield: &Playfield) -> bool {
    ball.pos.y <= ball.radius || ball.pos.y >= playfield.height - ball.radius
}

/// Negate horizontal velocity
#[inline]
pub fn reflect_x(vel: Vec2) -> Vec2 {
    Vec2::new(-vel.x, vel.y)
}

/// Negate vertical velocity
#[inline]
pub fn reflect_y(vel: Vec2) -> Vec2 {
    Vec2::new(vel.x, -vel.y)
}
