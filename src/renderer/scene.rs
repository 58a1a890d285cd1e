//! Draw-command generation
//!
//! `compose` turns a `GameState` into an ordered list of 2D primitives.
//! It only reads the state; backends replay the list onto a surface.

use glam::Vec2;

use crate::sim::state::{Ball, Brick, Color, GameState, Paddle, PowerUp, colors};

/// Corner radius for bricks
const BRICK_CORNER: f32 = 4.0;
/// Corner radius for paddle segments
const PADDLE_CORNER: f32 = 10.0;
const PADDLE_STROKE_WIDTH: f32 = 2.0;
/// Shadow blur around balls
const BALL_GLOW: f32 = 10.0;
const POWER_UP_FONT_PX: f32 = 24.0;

/// Outline for a filled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// One 2D drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface
    Clear { width: f32, height: f32 },
    /// Filled rounded rectangle, optionally outlined
    RoundedRect {
        pos: Vec2,
        size: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    /// Filled circle with a same-colored glow
    GlowCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        glow: f32,
    },
    /// Text centered horizontally on `pos`, baseline at `pos.y`
    Text {
        pos: Vec2,
        text: &'static str,
        font_px: f32,
        color: Color,
    },
}

/// Build the frame for the current state
///
/// Back to front: bricks, paddle, power-ups, balls.
pub fn compose(state: &GameState) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(
        1 + state.bricks.len()
            + state.paddle.count as usize
            + state.power_ups.len()
            + state.balls.len(),
    );

    commands.push(DrawCommand::Clear {
        width: state.field.width,
        height: state.field.height,
    });
    commands.extend(state.bricks.iter().filter(|b| b.alive).map(brick));
    paddle(&state.paddle, &mut commands);
    commands.extend(state.power_ups.iter().map(power_up));
    commands.extend(state.balls.iter().map(ball));

    commands
}

fn brick(brick: &Brick) -> DrawCommand {
    DrawCommand::RoundedRect {
        pos: brick.pos,
        size: brick.size,
        radius: BRICK_CORNER,
        fill: brick.color,
        stroke: None,
    }
}

fn paddle(paddle: &Paddle, commands: &mut Vec<DrawCommand>) {
    let fill = if paddle.is_flashing() {
        colors::PADDLE_FLASH
    } else {
        paddle.color
    };
    for i in 0..paddle.count {
        commands.push(DrawCommand::RoundedRect {
            pos: Vec2::new(paddle.segment_x(i), paddle.pos.y),
            size: Vec2::new(paddle.width, paddle.height),
            radius: PADDLE_CORNER,
            fill,
            stroke: Some(Stroke {
                color: colors::WHITE,
                width: PADDLE_STROKE_WIDTH,
            }),
        });
    }
}

fn power_up(power_up: &PowerUp) -> DrawCommand {
    DrawCommand::Text {
        pos: power_up.pos,
        text: power_up.kind.symbol(),
        font_px: POWER_UP_FONT_PX,
        color: power_up.kind.color(),
    }
}

fn ball(ball: &Ball) -> DrawCommand {
    DrawCommand::GlowCircle {
        center: ball.pos,
        radius: ball.radius,
        color: ball.color,
        glow: BALL_GLOW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::powerup;
    use crate::sim::{Field, PowerUpKind, SequenceRng};

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), Field::new(500.0, 400.0));
        state.reset_balls(&mut SequenceRng::constant(0.9));
        state
    }

    #[test]
    fn test_frame_order_and_counts() {
        let mut state = state();
        state.bricks[0].alive = false;
        state.paddle.count = 2;
        powerup::spawn(&mut state, PowerUpKind::MultiBall, Vec2::new(100.0, 100.0));

        let commands = compose(&state);
        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                width: 500.0,
                height: 400.0
            }
        );
        // clear + 47 bricks + 2 segments + 1 power-up + 1 ball
        assert_eq!(commands.len(), 1 + 47 + 2 + 1 + 1);
        assert!(matches!(commands.last(), Some(DrawCommand::GlowCircle { .. })));
        assert!(matches!(
            commands[commands.len() - 2],
            DrawCommand::Text { text: "🧉", .. }
        ));
    }

    #[test]
    fn test_compose_is_pure() {
        let mut state = state();
        powerup::spawn(&mut state, PowerUpKind::SplitPaddle, Vec2::new(100.0, 100.0));
        let before = serde_json::to_string(&state).unwrap();
        let first = compose(&state);
        let second = compose(&state);
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_paddle_flash_tint() {
        let mut state = state();
        state.paddle.flash = 0.2;
        let commands = compose(&state);
        let fills: Vec<Color> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RoundedRect {
                    fill,
                    stroke: Some(_),
                    ..
                } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![colors::PADDLE_FLASH]);
    }
}
