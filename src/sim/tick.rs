//! Fixed timestep simulation tick
//!
//! One tick is `advance` then `resolve_collisions`, followed by any deferred
//! respawn that has come due. Velocities are per tick, so the simulation
//! speed is tied to the loop cadence (50 Hz by default).

use rand::Rng;

use super::collision::{ball_paddle_overlap, ball_wall_contact, goal_scorer, reflect_x, reflect_y};
use super::state::{GameEvent, GameState, Paddle, PendingRespawn, Playfield, Side, SpeedPolicy};
use crate::consts::RESPAWN_SPREAD;
use crate::{offscreen, velocity_from_angle};

impl GameState {
    /// Lay out ball and paddles for `playfield`
    ///
    /// A repeat call with the same size does nothing. A new size re-centers
    /// everything but keeps score, velocity, grab flags and any pending reset.
    pub fn initialize(&mut self, playfield: Playfield) {
        if self.initialized && self.playfield == playfield {
            return;
        }

        let first = !self.initialized;
        self.playfield = playfield;
        self.initialized = true;

        let left_grabbed = self.left.grabbed;
        let right_grabbed = self.right.grabbed;
        self.left = Paddle::new(Side::Left, &playfield);
        self.right = Paddle::new(Side::Right, &playfield);
        self.left.grabbed = left_grabbed;
        self.right.grabbed = right_grabbed;

        self.ball.radius = playfield.ball_radius();
        self.ball.pos = if self.is_resetting {
            offscreen()
        } else {
            playfield.center()
        };
        if first {
            self.ball.vel = self.rules.serve_velocity;
        }

        log::info!(
            "Court laid out at {}x{} (paddle {}x{}, ball radius {})",
            playfield.width,
            playfield.height,
            playfield.paddle_width(),
            playfield.paddle_height(),
            playfield.ball_radius()
        );
    }

    /// Move the ball by one tick of velocity. No clamping, no sub-stepping.
    #[inline]
    pub fn advance(&mut self) {
        self.ball.pos += self.ball.vel;
    }

    /// Scoring, paddle and wall checks, in that order
    ///
    /// Only scoring is gated by `is_resetting`; the bounce checks always run,
    /// even against the parked ball.
    pub fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        if !self.is_resetting {
            if let Some(side) = goal_scorer(&self.ball, &self.playfield) {
                self.score.award(side);
                log::info!(
                    "{} scores ({} - {})",
                    side.as_str(),
                    self.score.left,
                    self.score.right
                );
                events.push(GameEvent::Scored { side });
                self.reset_ball();
            }
        }

        for side in [Side::Left, Side::Right] {
            if ball_paddle_overlap(&self.ball, self.paddle(side)) {
                self.ball.vel = reflect_x(self.ball.vel);
                log::trace!("Ball hit {} paddle at {:?}", side.as_str(), self.ball.pos);
                events.push(GameEvent::PaddleHit { side });
            }
        }

        if ball_wall_contact(&self.ball, &self.playfield) {
            self.ball.vel = reflect_y(self.ball.vel);
            events.push(GameEvent::WallHit);
        }
    }

    /// Hide the ball and schedule its respawn
    ///
    /// Speed and direction inputs are captured now, not when the respawn fires.
    pub fn reset_ball(&mut self) {
        self.is_resetting = true;
        let pending = PendingRespawn {
            remaining_ticks: self.rules.reset_delay_ticks,
            speed: self.ball.speed(),
            prev_vx: self.ball.vel.x,
        };
        self.ball.pos = offscreen();
        self.pending_respawn = Some(pending);
        log::debug!(
            "Ball reset scheduled in {} ticks (speed {:.2})",
            pending.remaining_ticks,
            pending.speed
        );
    }

    /// Count down a pending respawn; fires it when due
    fn step_pending_respawn(&mut self, events: &mut Vec<GameEvent>) {
        let Some(mut pending) = self.pending_respawn else {
            return;
        };
        pending.remaining_ticks = pending.remaining_ticks.saturating_sub(1);
        if pending.remaining_ticks > 0 {
            self.pending_respawn = Some(pending);
            return;
        }

        self.pending_respawn = None;
        self.respawn(pending);
        events.push(GameEvent::Respawned);
    }

    /// Put the ball back at center with a fresh random heading
    fn respawn(&mut self, pending: PendingRespawn) {
        let speed = match self.rules.speed_policy {
            SpeedPolicy::CarryForward => pending.speed,
            SpeedPolicy::Fixed => self.rules.serve_velocity.length(),
        };
        // Serve toward the side that just scored: 0 after a leftward exit, π otherwise
        let base = if pending.prev_vx < 0.0 {
            0.0
        } else {
            std::f32::consts::PI
        };
        let offset = self.rng().random_range(-RESPAWN_SPREAD..=RESPAWN_SPREAD);
        let angle = base + offset;

        self.ball.pos = self.playfield.center();
        self.ball.vel = velocity_from_angle(speed, angle);
        self.is_resetting = false;

        log::debug!(
            "Ball respawned at {:?} heading {:.1} deg",
            self.ball.pos,
            angle.to_degrees()
        );
    }

    /// Move a paddle to the clamped input y
    pub fn drag_paddle(&mut self, side: Side, y: f32) {
        let clamped = self.playfield.clamp_paddle_y(y);
        self.paddle_mut(side).pos.y = clamped;
    }

    pub fn set_grabbed(&mut self, side: Side, grabbed: bool) {
        self.paddle_mut(side).grabbed = grabbed;
    }
}

/// Advance the game state by one fixed tick and return what happened
///
/// Does nothing until the court has been laid out with `initialize`.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.initialized {
        return events;
    }

    // A reset scheduled during this tick starts counting on the next one
    let was_pending = state.pending_respawn.is_some();

    state.time_ticks += 1;
    state.advance();
    state.resolve_collisions(&mut events);
    if was_pending {
        state.step_pending_respawn(&mut events);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Rules;
    use glam::Vec2;
    use proptest::prelude::*;

    fn court() -> GameState {
        GameState::with_playfield(12345, Rules::default(), Playfield::new(400.0, 800.0))
    }

    /// Heading of `vel` measured from `base`, wrapped to [-π, π)
    fn heading_from(vel: Vec2, base: f32) -> f32 {
        use std::f32::consts::{PI, TAU};
        let mut angle = vel.y.atan2(vel.x) - base;
        while angle >= PI {
            angle -= TAU;
        }
        while angle < -PI {
            angle += TAU;
        }
        angle
    }

    #[test]
    fn test_initialize_layout() {
        let state = court();
        assert_eq!(state.ball.pos, Vec2::new(200.0, 400.0));
        assert_eq!(state.ball.vel, Vec2::new(10.0, 10.0));
        assert_eq!(state.ball.radius, 8.0);
        assert_eq!(state.left.pos, Vec2::new(16.0, 400.0));
        assert_eq!(state.right.pos, Vec2::new(384.0, 400.0));
        assert_eq!(state.left.height, 160.0);
    }

    #[test]
    fn test_initialize_same_size_is_noop() {
        let mut state = court();
        state.ball.pos = Vec2::new(123.0, 321.0);
        state.drag_paddle(Side::Left, 200.0);
        state.initialize(Playfield::new(400.0, 800.0));
        assert_eq!(state.ball.pos, Vec2::new(123.0, 321.0));
        assert_eq!(state.left.pos.y, 200.0);
    }

    #[test]
    fn test_initialize_new_size_keeps_score() {
        let mut state = court();
        state.score.left = 3;
        state.ball.vel = Vec2::new(-4.0, 2.0);
        state.initialize(Playfield::new(1000.0, 500.0));
        assert_eq!(state.score.left, 3);
        assert_eq!(state.ball.pos, Vec2::new(500.0, 250.0));
        assert_eq!(state.ball.vel, Vec2::new(-4.0, 2.0));
        assert_eq!(state.right.pos.x, 1000.0 - 40.0);
    }

    #[test]
    fn test_tick_before_initialize_does_nothing() {
        let mut state = GameState::new(1, Rules::default());
        let events = tick(&mut state);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.ball.pos, Vec2::ZERO);
    }

    #[test]
    fn test_advance_then_resolve() {
        let mut state = court();
        let events = tick(&mut state);
        assert!(events.is_empty());
        assert_eq!(state.ball.pos, Vec2::new(210.0, 410.0));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_wall_bounce() {
        let mut state = court();
        state.ball.pos = Vec2::new(200.0, 785.0);
        state.ball.vel = Vec2::new(5.0, 10.0);
        let events = tick(&mut state);
        assert_eq!(events, vec![GameEvent::WallHit]);
        assert_eq!(state.ball.vel, Vec2::new(5.0, -10.0));
    }

    #[test]
    fn test_paddle_bounce() {
        let mut state = court();
        state.ball.pos = Vec2::new(35.0, 400.0);
        state.ball.vel = Vec2::new(-10.0, 0.0);
        let events = tick(&mut state);
        assert_eq!(events, vec![GameEvent::PaddleHit { side: Side::Left }]);
        assert_eq!(state.ball.vel, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_miss_when_paddle_out_of_the_way() {
        let mut state = court();
        state.drag_paddle(Side::Left, 0.0);
        state.ball.pos = Vec2::new(35.0, 400.0);
        state.ball.vel = Vec2::new(-10.0, 0.0);
        tick(&mut state);
        assert_eq!(state.ball.vel, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_scores_exactly_once_per_reset_cycle() {
        let mut state = court();
        state.ball.pos = Vec2::new(5.0, 400.0);
        state.ball.vel = Vec2::new(-12.0, 3.0);

        let mut events = Vec::new();
        state.resolve_collisions(&mut events);
        assert_eq!(state.score.right, 1);
        assert!(state.is_resetting);
        assert!(events.contains(&GameEvent::Scored { side: Side::Right }));

        // Ball still past the line, but the reset is pending
        state.ball.pos = Vec2::new(2.0, 400.0);
        state.resolve_collisions(&mut events);
        state.resolve_collisions(&mut events);
        assert_eq!(state.score.right, 1);
        assert_eq!(state.score.left, 0);
    }

    #[test]
    fn test_left_scores_on_right_exit() {
        let mut state = court();
        state.ball.pos = Vec2::new(390.0, 100.0);
        state.ball.vel = Vec2::new(5.0, 0.0);
        let events = tick(&mut state);
        assert_eq!(state.score.left, 1);
        assert_eq!(state.score.right, 0);
        assert_eq!(events[0], GameEvent::Scored { side: Side::Left });
        assert_eq!(state.ball.pos, offscreen());
    }

    #[test]
    fn test_full_reset_cycle() {
        let mut state = court();
        state.ball.pos = Vec2::new(5.0, 400.0);
        state.ball.vel = Vec2::new(-12.0, 3.0);

        let mut events = Vec::new();
        state.resolve_collisions(&mut events);
        assert_eq!(state.score.right, 1);
        assert_eq!(state.ball.pos, offscreen());

        let delay = state.rules.reset_delay_ticks;
        assert_eq!(delay, 50);
        for _ in 0..delay - 1 {
            let events = tick(&mut state);
            assert!(!events.contains(&GameEvent::Respawned));
            assert!(state.is_resetting);
        }
        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::Respawned));
        assert!(!state.is_resetting);
        assert_eq!(state.ball.pos, Vec2::new(200.0, 400.0));
        assert!((state.ball.speed() - 153.0_f32.sqrt()).abs() < 1e-3);

        // Previous vx < 0, so the new heading is within ±45° of 0
        let heading = heading_from(state.ball.vel, 0.0);
        assert!(heading.abs() <= RESPAWN_SPREAD + 1e-5);
        assert_eq!(state.score.right, 1);
        assert_eq!(state.score.left, 0);
    }

    #[test]
    fn test_respawn_heads_left_after_rightward_exit() {
        let mut state = court();
        state.ball.pos = Vec2::new(395.0, 400.0);
        state.ball.vel = Vec2::new(8.0, -6.0);
        tick(&mut state);
        for _ in 0..state.rules.reset_delay_ticks {
            tick(&mut state);
        }
        assert!(!state.is_resetting);
        assert!(state.ball.vel.x < 0.0);
        let heading = heading_from(state.ball.vel, std::f32::consts::PI);
        assert!(heading.abs() <= RESPAWN_SPREAD + 1e-5);
    }

    #[test]
    fn test_fixed_speed_policy() {
        let rules = Rules {
            speed_policy: SpeedPolicy::Fixed,
            reset_delay_ticks: 1,
            ..Rules::default()
        };
        let mut state = GameState::with_playfield(7, rules, Playfield::new(400.0, 800.0));
        state.ball.pos = Vec2::new(5.0, 400.0);
        state.ball.vel = Vec2::new(-30.0, 0.0);
        let mut events = Vec::new();
        state.resolve_collisions(&mut events);
        tick(&mut state);
        assert!(!state.is_resetting);
        assert!((state.ball.speed() - 200.0_f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_drag_paddle_clamps() {
        let mut state = court();
        state.drag_paddle(Side::Left, -500.0);
        assert_eq!(state.left.pos.y, 80.0);
        state.drag_paddle(Side::Right, 5000.0);
        assert_eq!(state.right.pos.y, 720.0);
        state.drag_paddle(Side::Right, 300.0);
        assert_eq!(state.right.pos.y, 300.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut a = court();
        let mut b = court();
        for state in [&mut a, &mut b] {
            state.ball.vel = Vec2::new(-9.0, 7.0);
        }
        for i in 0..2000 {
            let y = 400.0 + (i as f32 * 0.05).sin() * 300.0;
            a.drag_paddle(Side::Left, y);
            b.drag_paddle(Side::Left, y);
            assert_eq!(tick(&mut a), tick(&mut b));
        }
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.score, b.score);
    }

    proptest! {
        #[test]
        fn prop_advance_is_exact(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let mut state = court();
            state.ball.pos = Vec2::new(x, y);
            state.ball.vel = Vec2::new(vx, vy);
            state.advance();
            prop_assert_eq!(state.ball.pos, Vec2::new(x + vx, y + vy));
            prop_assert_eq!(state.ball.vel, Vec2::new(vx, vy));
        }

        #[test]
        fn prop_bounces_preserve_speed(
            x in 0.0f32..400.0,
            y in 0.0f32..800.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let mut state = court();
            state.is_resetting = true;
            state.ball.pos = Vec2::new(x, y);
            state.ball.vel = Vec2::new(vx, vy);
            let before = state.ball.speed();
            let mut events = Vec::new();
            state.resolve_collisions(&mut events);
            prop_assert_eq!(state.ball.speed(), before);
            prop_assert_eq!(state.ball.vel.x.abs(), vx.abs());
            prop_assert_eq!(state.ball.vel.y.abs(), vy.abs());
        }

        #[test]
        fn prop_paddle_always_in_range(y in -1.0e6f32..1.0e6) {
            let mut state = court();
            state.drag_paddle(Side::Right, y);
            let p = state.right.pos.y;
            prop_assert!((80.0..=720.0).contains(&p));
        }

        #[test]
        fn prop_respawn_within_window(
            seed in any::<u64>(),
            vx in prop_oneof![-40.0f32..-0.5, 0.5f32..40.0],
            vy in -40.0f32..40.0,
        ) {
            let rules = Rules { reset_delay_ticks: 1, ..Rules::default() };
            let mut state = GameState::with_playfield(seed, rules, Playfield::new(400.0, 800.0));
            state.ball.vel = Vec2::new(vx, vy);
            let speed = state.ball.speed();
            state.reset_ball();
            tick(&mut state);

            prop_assert!(!state.is_resetting);
            prop_assert_eq!(state.ball.pos, Vec2::new(200.0, 400.0));
            prop_assert!((state.ball.speed() - speed).abs() <= speed * 1e-4);
            let base = if vx < 0.0 { 0.0 } else { std::f32::consts::PI };
            prop_assert!(heading_from(state.ball.vel, base).abs() <= RESPAWN_SPREAD + 1e-4);
        }
    }
}
