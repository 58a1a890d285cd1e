//! Power-up engine: spawn policy, falling motion, pickup and effects
//!
//! Lifecycle per pickup: spawned at a destroyed brick, falls straight down,
//! then either lands on the paddle (collected) or leaves the field (expired).
//! Effects are permanent for the rest of the run.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Ball, GameEvent, GameState, PowerUp, PowerUpKind, SoundEffect};

/// Roll the drop chance for a destroyed brick and spawn a pickup at `center`
pub fn maybe_spawn<R: RandomSource>(
    state: &mut GameState,
    center: Vec2,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    if !rng.chance(state.config.power_up_chance) {
        return;
    }
    let kind = PowerUpKind::ALL[rng.pick(PowerUpKind::ALL.len())];
    spawn(state, kind, center);
    log::debug!("Spawned {} at ({:.0}, {:.0})", kind.name(), center.x, center.y);
    events.push(GameEvent::PowerUpSpawned(kind));
}

/// Add a falling pickup of `kind` centered on `center`
pub fn spawn(state: &mut GameState, kind: PowerUpKind, center: Vec2) {
    let id = state.next_entity_id();
    let size = state.config.power_up_size;
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos: center,
        size: Vec2::splat(size),
        fall_speed: state.config.power_up_fall_speed,
    });
}

/// Move every pickup down by `frames` reference frames, then collect or expire them
pub fn advance<R: RandomSource>(
    state: &mut GameState,
    frames: f32,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    for power_up in state.power_ups.iter_mut() {
        power_up.pos.y += power_up.fall_speed * frames;
    }

    let paddle = &state.paddle;
    let paddle_left = paddle.pos.x;
    let paddle_right = paddle.pos.x + paddle.total_width();
    let paddle_top = paddle.pos.y;
    let field_height = state.field.height;

    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.power_ups.retain(|p| {
        let landed = p.pos.y + p.size.y / 2.0 > paddle_top;
        let over_paddle = p.pos.x > paddle_left && p.pos.x < paddle_right;
        if landed && over_paddle {
            collected.push(p.kind);
            false
        } else {
            // Expired pickups vanish silently
            p.pos.y <= field_height
        }
    });

    for kind in collected {
        apply(state, kind, rng);
        state.paddle.flash = state.config.flash_duration;
        log::debug!("Collected {}", kind.name());
        events.push(GameEvent::PowerUpCollected(kind));
        events.push(GameEvent::PaddleFlash);
        events.push(GameEvent::Sound(SoundEffect::PowerUp));
    }
}

/// Apply a collected effect
pub fn apply<R: RandomSource>(state: &mut GameState, kind: PowerUpKind, rng: &mut R) {
    let config = &state.config;
    match kind {
        PowerUpKind::MultiBall => {
            let template = match state.balls.first() {
                Some(ball) => ball.clone(),
                None => {
                    let id = state.next_entity_id();
                    Ball::serve(id, &state.paddle, &state.config, rng)
                }
            };
            let count = state.config.multi_ball_count;
            let spread = state.config.multi_ball_spread;
            for _ in 0..count {
                let id = state.next_entity_id();
                let dx = (rng.unit() - 0.5) * spread;
                state.balls.push(Ball {
                    id,
                    vel: Vec2::new(dx, -template.vel.y.abs()),
                    ..template.clone()
                });
            }
        }
        PowerUpKind::ExpandPaddle => {
            let cap = config.max_paddle_width(state.field.width);
            state.paddle.width = (state.paddle.width + config.expand_step).min(cap);
            state.paddle.clamp_to(state.field.width);
        }
        PowerUpKind::EnlargeBall => {
            let step = config.enlarge_step;
            let cap = config.max_ball_radius;
            for ball in state.balls.iter_mut() {
                ball.radius = (ball.radius + step).min(cap);
            }
        }
        PowerUpKind::SplitPaddle => {
            state.paddle.count = (state.paddle.count * 2).min(config.max_segments);
            state.paddle.clamp_to(state.field.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::rng::SequenceRng;
    use crate::sim::state::Field;

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), Field::new(500.0, 400.0));
        state.reset_balls(&mut SequenceRng::constant(0.9));
        state
    }

    #[test]
    fn test_expand_paddle() {
        let mut state = state();
        let mut rng = SequenceRng::constant(0.5);
        apply(&mut state, PowerUpKind::ExpandPaddle, &mut rng);
        assert_eq!(state.paddle.width, 140.0);

        // Capped at 90% of the field
        for _ in 0..20 {
            apply(&mut state, PowerUpKind::ExpandPaddle, &mut rng);
        }
        assert!((state.paddle.width - 450.0).abs() < 0.001);
        assert!(state.paddle.pos.x >= 0.0);
        assert!(state.paddle.pos.x <= 500.0 - state.paddle.total_width() + 0.001);
    }

    #[test]
    fn test_expand_paddle_small_field() {
        let mut state = GameState::new(GameConfig::default(), Field::new(120.0, 400.0));
        apply(&mut state, PowerUpKind::ExpandPaddle, &mut SequenceRng::constant(0.5));
        assert!((state.paddle.width - 108.0).abs() < 0.001);
    }

    #[test]
    fn test_enlarge_ball_capped() {
        let mut state = state();
        let mut rng = SequenceRng::constant(0.5);
        apply(&mut state, PowerUpKind::EnlargeBall, &mut rng);
        assert_eq!(state.balls[0].radius, 13.0);
        for _ in 0..10 {
            apply(&mut state, PowerUpKind::EnlargeBall, &mut rng);
        }
        assert_eq!(state.balls[0].radius, 40.0);
    }

    #[test]
    fn test_split_paddle_powers_of_two() {
        let mut state = state();
        let mut rng = SequenceRng::constant(0.5);
        let mut seen = vec![state.paddle.count];
        for _ in 0..5 {
            apply(&mut state, PowerUpKind::SplitPaddle, &mut rng);
            seen.push(state.paddle.count);
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 8, 8]);
    }

    #[test]
    fn test_multi_ball_clones_upward() {
        let mut state = state();
        state.balls[0].vel.y = 3.0; // falling
        state.balls[0].radius = 13.0;
        let mut rng = SequenceRng::new(vec![0.0, 0.5, 0.75]);
        apply(&mut state, PowerUpKind::MultiBall, &mut rng);

        assert_eq!(state.balls.len(), 4);
        let clones = &state.balls[1..];
        assert_eq!(clones[0].vel, Vec2::new(-4.0, -3.0));
        assert_eq!(clones[1].vel, Vec2::new(0.0, -3.0));
        assert_eq!(clones[2].vel, Vec2::new(2.0, -3.0));
        for clone in clones {
            assert_eq!(clone.pos, state.balls[0].pos);
            assert_eq!(clone.radius, 13.0);
        }
        let mut ids: Vec<u32> = state.balls.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_multi_ball_without_balls() {
        let mut state = state();
        state.balls.clear();
        apply(&mut state, PowerUpKind::MultiBall, &mut SequenceRng::constant(0.5));
        assert_eq!(state.balls.len(), 3);
        assert!(state.balls.iter().all(|b| b.vel.y < 0.0));
    }

    #[test]
    fn test_spawn_roll() {
        let mut state = state();
        let mut events = Vec::new();

        // 0.2 misses the 15% roll
        let mut rng = SequenceRng::constant(0.2);
        maybe_spawn(&mut state, Vec2::new(100.0, 50.0), &mut rng, &mut events);
        assert!(state.power_ups.is_empty());

        // 0.1 hits; second sample 0.6 picks index 2
        rng = SequenceRng::new(vec![0.1, 0.6]);
        maybe_spawn(&mut state, Vec2::new(100.0, 50.0), &mut rng, &mut events);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].kind, PowerUpKind::EnlargeBall);
        assert_eq!(events, vec![GameEvent::PowerUpSpawned(PowerUpKind::EnlargeBall)]);
    }

    #[test]
    fn test_fall_and_collect() {
        let mut state = state();
        let mut rng = SequenceRng::constant(0.5);
        let mut events = Vec::new();
        let x = state.paddle.center_x();
        spawn(&mut state, PowerUpKind::ExpandPaddle, Vec2::new(x, 300.0));

        advance(&mut state, 1.0, &mut rng, &mut events);
        assert_eq!(state.power_ups[0].pos.y, 302.0);
        assert!(events.is_empty());

        // Drop it onto the paddle plane (y = 370)
        state.power_ups[0].pos.y = 354.0;
        advance(&mut state, 1.0, &mut rng, &mut events);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.paddle.width, 140.0);
        assert!(state.paddle.is_flashing());
        assert!(events.contains(&GameEvent::Sound(SoundEffect::PowerUp)));
        assert!(events.contains(&GameEvent::PaddleFlash));
    }

    #[test]
    fn test_expire_off_screen() {
        let mut state = state();
        let mut events = Vec::new();
        spawn(&mut state, PowerUpKind::SplitPaddle, Vec2::new(5.0, 399.0));
        advance(&mut state, 1.0, &mut SequenceRng::constant(0.5), &mut events);
        assert!(state.power_ups.is_empty());
        assert!(events.is_empty());
        assert_eq!(state.paddle.count, 1);
    }
}
