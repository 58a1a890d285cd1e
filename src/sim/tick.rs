//! Simulation step
//!
//! Core game loop that advances the game by one step. Motion is expressed in
//! pixels per reference frame and scaled by `dt * REFERENCE_FPS`, so a step
//! of `SIM_DT` moves everything by exactly its per-frame velocity.

use glam::Vec2;

use super::collision::{
    PaddleContact, ball_paddle_contact, ball_wall_contact, point_in_rect, reflect_velocity,
};
use super::layout::build_bricks;
use super::powerup;
use super::rng::RandomSource;
use super::state::{Field, GameEvent, GamePhase, GameState, SoundEffect};
use crate::consts::REFERENCE_FPS;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired paddle center X in field pixels (from mouse/touch position)
    pub target_x: Option<f32>,
    /// Start button: new run, or relaunch after a lost ball
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the paddle plays itself
    pub autopilot: bool,
}

/// Advance the game state by one step of `dt` seconds
pub fn tick<R: RandomSource>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Flash feedback runs on wall-clock time, paused or not
    state.paddle.flash = (state.paddle.flash - dt).max(0.0);

    let mut input = input.clone();
    if input.autopilot {
        steer(state, &mut input);
    }
    let input = &input;

    // Pointer input moves the paddle in every phase
    if let Some(x) = input.target_x {
        state.paddle.center_on(x, state.field.width);
    }

    if input.start {
        start(state, rng, &mut events);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;
    let frames = dt * REFERENCE_FPS;

    powerup::advance(state, frames, rng, &mut events);
    advance_balls(state, frames, &mut events);

    if state.balls.is_empty() {
        lose_life(state, rng, &mut events);
        return events;
    }

    detect_brick_hits(state, rng, &mut events);

    state.normalize_order();
    events
}

/// Start a run from Idle/GameOver/Won, or relaunch after a lost ball
///
/// Ignored while Playing or Paused.
pub fn start<R: RandomSource>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    let fresh = match state.phase {
        GamePhase::Idle | GamePhase::GameOver | GamePhase::Won => true,
        GamePhase::BallLost => false,
        GamePhase::Playing | GamePhase::Paused => return,
    };

    if fresh {
        state.score = 0;
        state.lives = state.config.starting_lives;
        state.paddle.width = state.config.paddle_width;
        state.paddle.count = 1;
        state.paddle.clamp_to(state.field.width);
        state.bricks = build_bricks(&state.config, state.field.width);
        events.push(GameEvent::ScoreChanged(state.score));
        events.push(GameEvent::LivesChanged(state.lives));
        log::info!("New game started ({} bricks)", state.bricks.len());
    } else {
        log::info!("Relaunching with {} lives left", state.lives);
    }

    state.reset_balls(rng);
    state.power_ups.clear();
    state.phase = GamePhase::Playing;
    events.push(GameEvent::Started { fresh });
}

/// Resize the field: re-seat the paddle and, outside of a run, rebuild the grid
pub fn resize(state: &mut GameState, width: f32, height: f32) {
    state.field = Field::new(width, height);
    state.paddle.place(&state.config, state.field);
    if !state.is_running() {
        state.bricks = build_bricks(&state.config, width);
    }
    log::info!("Field resized to {:.0}x{:.0}", width, height);
}

/// Wall, paddle and floor tests for every ball, then integrate positions
fn advance_balls(state: &mut GameState, frames: f32, events: &mut Vec<GameEvent>) {
    let speed = state.config.ball_speed;
    let field = state.field;
    let paddle = &state.paddle;

    state.balls.retain_mut(|ball| {
        let next = ball.pos + ball.vel * frames;

        let walls = ball_wall_contact(next, ball.radius, field.width);
        if walls.side {
            ball.vel = reflect_velocity(ball.vel, Vec2::X);
            events.push(GameEvent::Sound(SoundEffect::Bounce));
        }

        if walls.top {
            ball.vel = reflect_velocity(ball.vel, Vec2::Y);
            events.push(GameEvent::Sound(SoundEffect::Bounce));
        } else {
            match ball_paddle_contact(ball.pos.x, next.y, ball.radius, paddle, field.height) {
                PaddleContact::Hit { offset } => {
                    ball.vel.x = offset * speed;
                    ball.vel.y = -ball.vel.y.abs();
                    events.push(GameEvent::Sound(SoundEffect::Bounce));
                }
                PaddleContact::Lost => return false,
                PaddleContact::Clear | PaddleContact::Passing => {}
            }
        }

        ball.pos += ball.vel * frames;
        true
    });
}

/// Every ball is gone: spend a life, then relaunch or end the run
fn lose_life<R: RandomSource>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::LivesChanged(state.lives));

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over with {} points", state.score);
    } else {
        state.reset_balls(rng);
        state.phase = GamePhase::BallLost;
        events.push(GameEvent::BallLost {
            lives_left: state.lives,
        });
        log::debug!("Ball lost, {} lives left", state.lives);
    }
}

/// Center-point test of every ball against every live brick
///
/// All balls inside a brick reflect vertically, but the brick is destroyed
/// and scored once.
fn detect_brick_hits<R: RandomSource>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let mut destroyed_any = false;

    for i in 0..state.bricks.len() {
        let brick = &state.bricks[i];
        if !brick.alive {
            continue;
        }
        let (top_left, size) = (brick.pos, brick.size);

        let mut hit = false;
        for ball in state.balls.iter_mut() {
            if point_in_rect(ball.pos, top_left, size) {
                ball.vel.y = -ball.vel.y;
                hit = true;
            }
        }
        if !hit {
            continue;
        }

        let brick = &mut state.bricks[i];
        brick.alive = false;
        let (row, column, center) = (brick.row, brick.column, brick.center());

        state.score += state.config.brick_points;
        destroyed_any = true;
        events.push(GameEvent::BrickDestroyed { row, column });
        events.push(GameEvent::ScoreChanged(state.score));
        events.push(GameEvent::Sound(SoundEffect::Bounce));

        powerup::maybe_spawn(state, center, rng, events);
    }

    if destroyed_any && state.bricks_remaining() == 0 {
        state.phase = GamePhase::Won;
        events.push(GameEvent::Sound(SoundEffect::Win));
        events.push(GameEvent::Won { score: state.score });
        log::info!("Board cleared with {} points", state.score);
    }
}

/// Demo mode: relaunch lost balls, chase pickups when safe, otherwise track the lowest falling ball
fn steer(state: &GameState, input: &mut TickInput) {
    if state.phase == GamePhase::BallLost {
        input.start = true;
    }

    let paddle = &state.paddle;
    let half_field = state.field.height / 2.0;

    let threat = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let in_danger = threat.is_some_and(|b| b.pos.y > half_field);
    if !in_danger {
        let pickup = state.power_ups.iter().max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(pickup) = pickup {
            input.target_x = Some(pickup.pos.x);
            return;
        }
    }

    let Some(ball) = threat.or_else(|| state.balls.first()) else {
        return;
    };

    // Catch on the segment nearest the cluster center (even counts center on a gap)
    let middle = (paddle.count - 1) / 2;
    let segment_center = paddle.segment_x(middle) + paddle.width / 2.0;
    let segment_offset = segment_center - paddle.center_x();

    // Oscillating aim offset so rallies don't settle into a loop
    let t = state.time_ticks as f32 * 0.01;
    let wobble = (t.sin() * 0.3 + (t * 0.7).sin() * 0.15) * paddle.width * 0.5;

    input.target_x = Some(ball.pos.x - segment_offset - wobble);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::sim::rng::{SequenceRng, seeded};
    use crate::sim::state::{Ball, PowerUpKind, colors};

    fn new_state() -> GameState {
        GameState::new(GameConfig::default(), Field::new(500.0, 400.0))
    }

    fn started() -> (GameState, SequenceRng) {
        let mut state = new_state();
        let mut rng = SequenceRng::constant(0.9);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        (state, rng)
    }

    fn ball(id: u32, pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            id,
            pos,
            vel,
            radius: 8.0,
            color: colors::SUN,
        }
    }

    #[test]
    fn test_tick_idle_to_playing() {
        let mut state = new_state();
        let mut rng = SequenceRng::constant(0.9);

        // Tick without start - should stay idle
        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(events.is_empty());

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
        assert!(events.contains(&GameEvent::Started { fresh: true }));
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let (mut state, mut rng) = started();
        let before = state.balls[0].pos;

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Paused);
        let paused_at = state.balls[0].pos;
        assert_eq!(before, paused_at);

        // Nothing moves while paused
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.balls[0].pos, paused_at);

        // Start is ignored while paused; pause toggles back
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_right_wall_reflects() {
        let (mut state, mut rng) = started();
        state.balls = vec![ball(99, Vec2::new(490.0, 300.0), Vec2::new(3.0, -3.0))];

        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.balls[0].vel.x, -3.0);
        assert_eq!(state.balls[0].pos, Vec2::new(487.0, 297.0));
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Bounce)));
    }

    #[test]
    fn test_tick_scales_with_dt() {
        let (mut state, mut rng) = started();
        state.balls = vec![ball(99, Vec2::new(250.0, 300.0), Vec2::new(1.0, -3.0))];
        powerup::spawn(&mut state, PowerUpKind::EnlargeBall, Vec2::new(50.0, 100.0));
        let fall_speed = state.config.power_up_fall_speed;

        tick(&mut state, &TickInput::default(), 2.0 * SIM_DT, &mut rng);

        // Two reference frames in one step
        let moved = state.balls[0].pos - Vec2::new(250.0, 300.0);
        assert!((moved - Vec2::new(2.0, -6.0)).length() < 1e-4, "moved {moved}");
        let fell = state.power_ups[0].pos.y - 100.0;
        assert!((fell - 2.0 * fall_speed).abs() < 1e-4, "fell {fell}");
    }

    #[test]
    fn test_ceiling_reflects() {
        let (mut state, mut rng) = started();
        state.balls = vec![ball(99, Vec2::new(250.0, 10.0), Vec2::new(3.0, -3.0))];

        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.balls[0].vel.y, 3.0);
    }

    #[test]
    fn test_paddle_deflects_by_offset() {
        let (mut state, mut rng) = started();
        // Paddle spans 200..300 at y=370; hit 3/4 of the way across
        state.balls = vec![ball(99, Vec2::new(275.0, 360.0), Vec2::new(-1.0, 3.0))];

        tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        let b = &state.balls[0];
        assert!((b.vel.x - 1.5).abs() < 0.001);
        assert_eq!(b.vel.y, -3.0);
    }

    #[test]
    fn test_ball_lost_resets_and_waits() {
        let (mut state, mut rng) = started();
        state.balls = vec![ball(99, Vec2::new(20.0, 390.0), Vec2::new(0.0, 3.0))];

        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::BallLost);
        assert_eq!(state.balls.len(), 1);
        assert!(events.contains(&GameEvent::BallLost { lives_left: 2 }));

        // Relaunch keeps score and bricks
        state.score = 30;
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 30);
        assert_eq!(state.lives, 2);
        assert!(events.contains(&GameEvent::Started { fresh: false }));
    }

    #[test]
    fn test_last_life_ends_game() {
        let (mut state, mut rng) = started();
        state.lives = 1;
        state.balls = vec![ball(99, Vec2::new(20.0, 390.0), Vec2::new(0.0, 3.0))];

        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.balls.is_empty());
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_brick_scores_once_for_overlapping_balls() {
        let (mut state, mut rng) = started();
        let center = state.bricks[0].center();
        state.balls = vec![
            ball(98, center, Vec2::new(0.0, -3.0)),
            ball(99, center + Vec2::new(1.0, 0.0), Vec2::new(0.0, -3.0)),
        ];
        // Move the balls back one step so they end the step inside the brick
        for b in state.balls.iter_mut() {
            b.pos.y += 3.0;
        }

        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert!(!state.bricks[0].alive);
        assert_eq!(state.score, 10);
        assert!(state.balls.iter().all(|b| b.vel.y == 3.0));
        let destroyed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_last_brick_wins_once() {
        let (mut state, mut rng) = started();
        for brick in state.bricks.iter_mut().skip(1) {
            brick.alive = false;
        }
        let center = state.bricks[0].center();
        state.balls = vec![
            ball(98, center + Vec2::new(0.0, 3.0), Vec2::new(0.0, -3.0)),
            ball(99, center + Vec2::new(2.0, 3.0), Vec2::new(0.0, -3.0)),
        ];

        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Won);
        let wins = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Won { .. }))
            .count();
        assert_eq!(wins, 1);
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Win)));

        // Loop is suspended until restart
        let frozen = state.balls.clone();
        let events = tick(&mut state, &TickInput::default(), SIM_DT, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.balls, frozen);
    }

    #[test]
    fn test_fresh_start_resets_run() {
        let (mut state, mut rng) = started();
        state.phase = GamePhase::GameOver;
        state.score = 120;
        state.lives = 0;
        state.paddle.count = 4;
        state.paddle.width = 180.0;
        state.bricks[3].alive = false;
        powerup::spawn(&mut state, PowerUpKind::MultiBall, Vec2::new(50.0, 50.0));

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.paddle.count, 1);
        assert_eq!(state.paddle.width, 100.0);
        assert_eq!(state.bricks_remaining(), 48);
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_resize_rebuilds_only_when_idle() {
        let mut state = new_state();
        resize(&mut state, 800.0, 600.0);
        assert_eq!(state.paddle.pos.y, 570.0);
        assert_eq!(state.paddle.pos.x, 350.0);
        assert!(state.bricks[0].size.x > 80.0);

        let mut rng = SequenceRng::constant(0.9);
        start(&mut state, &mut rng, &mut Vec::new());
        state.bricks[0].alive = false;
        resize(&mut state, 500.0, 400.0);
        assert!(!state.bricks[0].alive);
    }

    #[test]
    fn test_autopilot_relaunches() {
        let (mut state, mut rng) = started();
        state.phase = GamePhase::BallLost;
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let (mut state, mut rng) = started();
        state.balls = vec![ball(99, Vec2::new(80.0, 300.0), Vec2::new(0.0, 3.0))];
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut rng);
        assert!(state.paddle.covers(80.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state();
        let mut state2 = new_state();
        let mut rng1 = seeded(99999);
        let mut rng2 = seeded(99999);

        let inputs = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                target_x: Some(120.0),
                ..Default::default()
            },
            TickInput {
                autopilot: true,
                ..Default::default()
            },
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT, &mut rng1);
                tick(&mut state2, input, SIM_DT, &mut rng2);
            }
        }

        let a = serde_json::to_string(&state1).unwrap();
        let b = serde_json::to_string(&state2).unwrap();
        assert_eq!(a, b);
    }
}
