//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`; collaborators only read it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::build_bricks;
use super::rng::RandomSource;
use crate::config::GameConfig;

/// Opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Color from 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn css(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const CELESTE: Color = Color::hex(0x74ACDF);
    pub const WHITE: Color = Color::hex(0xFFFFFF);
    /// Sol de Mayo
    pub const SUN: Color = Color::hex(0xFFB81C);
    pub const PADDLE_FLASH: Color = Color::hex(0xFFD700);
    pub const MATE: Color = Color::hex(0x4CAF50);
    pub const COPA: Color = Color::hex(0xFFD700);
    pub const EMPANADA: Color = Color::hex(0xFFB81C);
    pub const ASADO: Color = Color::hex(0xF44336);
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, waiting on the start button
    Idle,
    /// Active gameplay
    Playing,
    /// Paused by the player (or the page losing focus)
    Paused,
    /// All balls lost with lives remaining, waiting for relaunch
    BallLost,
    /// Lives exhausted
    GameOver,
    /// Every brick destroyed
    Won,
}

/// Play area dimensions in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Ball {
    /// Fresh ball resting above the first paddle segment, heading up at a random diagonal
    pub fn serve<R: RandomSource>(
        id: u32,
        paddle: &Paddle,
        config: &GameConfig,
        rng: &mut R,
    ) -> Self {
        let dir = if rng.unit() > 0.5 { 1.0 } else { -1.0 };
        Self {
            id,
            pos: Vec2::new(
                paddle.pos.x + paddle.width / 2.0,
                paddle.pos.y - config.ball_radius - 1.0,
            ),
            vel: Vec2::new(config.ball_speed * dir, -config.ball_speed),
            radius: config.ball_radius,
            color: colors::SUN,
        }
    }
}

/// The player's paddle: `count` equal segments separated by `gap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge of the first segment, top edge
    pub pos: Vec2,
    /// Width of one segment
    pub width: f32,
    pub height: f32,
    pub gap: f32,
    /// Segment count: 1, 2, 4 or 8
    pub count: u32,
    pub color: Color,
    /// Seconds of pickup flash remaining
    pub flash: f32,
}

impl Paddle {
    pub fn new(config: &GameConfig, field: Field) -> Self {
        let mut paddle = Self {
            pos: Vec2::ZERO,
            width: config.paddle_width,
            height: config.paddle_height,
            gap: config.paddle_gap,
            count: 1,
            color: colors::CELESTE,
            flash: 0.0,
        };
        paddle.place(config, field);
        paddle
    }

    /// Width of the whole segment cluster
    pub fn total_width(&self) -> f32 {
        self.width * self.count as f32 + self.gap * (self.count.saturating_sub(1)) as f32
    }

    /// Left edge of segment `i`
    pub fn segment_x(&self, i: u32) -> f32 {
        self.pos.x + i as f32 * (self.width + self.gap)
    }

    /// Horizontal center of the segment cluster
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.total_width() / 2.0
    }

    /// Whether `x` lies strictly inside any segment span
    pub fn covers(&self, x: f32) -> bool {
        (0..self.count).any(|i| {
            let left = self.segment_x(i);
            x > left && x < left + self.width
        })
    }

    /// Keep the cluster inside the field (pinned left when wider than the field)
    pub fn clamp_to(&mut self, field_width: f32) {
        let max_x = (field_width - self.total_width()).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Move so the cluster is centered on `x`, then clamp
    pub fn center_on(&mut self, x: f32, field_width: f32) {
        self.pos.x = x - self.total_width() / 2.0;
        self.clamp_to(field_width);
    }

    /// Center horizontally and sit `paddle_bottom_margin` above the field bottom
    pub fn place(&mut self, config: &GameConfig, field: Field) {
        self.pos.y = field.height - config.paddle_bottom_margin;
        self.center_on(field.width / 2.0, field.width);
    }

    pub fn is_flashing(&self) -> bool {
        self.flash > 0.0
    }
}

/// A brick in the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub row: u32,
    pub column: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
    pub color: Color,
}

impl Brick {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Mate: three extra balls
    MultiBall,
    /// Copa: wider paddle segments
    ExpandPaddle,
    /// Empanada: bigger balls
    EnlargeBall,
    /// Asado: twice as many paddle segments
    SplitPaddle,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::MultiBall,
        PowerUpKind::ExpandPaddle,
        PowerUpKind::EnlargeBall,
        PowerUpKind::SplitPaddle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "Mate",
            PowerUpKind::ExpandPaddle => "Copa",
            PowerUpKind::EnlargeBall => "Empanada",
            PowerUpKind::SplitPaddle => "Asado",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "🧉",
            PowerUpKind::ExpandPaddle => "🏆",
            PowerUpKind::EnlargeBall => "🥟",
            PowerUpKind::SplitPaddle => "🥩",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::MultiBall => colors::MATE,
            PowerUpKind::ExpandPaddle => colors::COPA,
            PowerUpKind::EnlargeBall => colors::EMPANADA,
            PowerUpKind::SplitPaddle => colors::ASADO,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Center
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per reference frame
    pub fall_speed: f32,
}

/// Sound cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Wall, paddle or brick bounce
    Bounce,
    /// Power-up collected
    PowerUp,
    /// Last brick destroyed
    Win,
}

/// Something a tick produced that collaborators may react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { fresh: bool },
    Sound(SoundEffect),
    ScoreChanged(u32),
    LivesChanged(u8),
    BrickDestroyed { row: u32, column: u32 },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    PaddleFlash,
    BallLost { lives_left: u8 },
    GameOver { score: u32 },
    Won { score: u32 },
    Paused,
    Resumed,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub field: Field,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    /// Simulation tick counter (Playing ticks only)
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    /// Brick grid, column-major
    pub bricks: Vec<Brick>,
    /// Falling power-ups (sorted by id)
    pub power_ups: Vec<PowerUp>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game for a field of the given size
    pub fn new(config: GameConfig, field: Field) -> Self {
        let paddle = Paddle::new(&config, field);
        let bricks = build_bricks(&config, field.width);
        Self {
            lives: config.starting_lives,
            config,
            field,
            phase: GamePhase::Idle,
            score: 0,
            time_ticks: 0,
            paddle,
            balls: Vec::new(),
            bricks,
            power_ups: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace all balls with one fresh serve
    pub fn reset_balls<R: RandomSource>(&mut self, rng: &mut R) {
        let id = self.next_entity_id();
        self.balls = vec![Ball::serve(id, &self.paddle, &self.config, rng)];
    }

    /// Simulation is suspended
    pub fn is_paused(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// A run is in progress (possibly paused or awaiting relaunch)
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::BallLost
        )
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
