//! Game balance configuration
//!
//! Every tuning constant of a run lives here so a host page (or the native
//! demo) can override it with JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Brick grid ===
    pub brick_rows: u32,
    pub brick_columns: u32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,
    pub brick_height: f32,
    /// Points awarded per destroyed brick
    pub brick_points: u32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Horizontal gap between paddle segments
    pub paddle_gap: f32,
    /// Distance from the field bottom to the paddle top
    pub paddle_bottom_margin: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Base speed in pixels per reference frame
    pub ball_speed: f32,
    pub starting_lives: u8,

    // === Power-ups ===
    /// Probability that a destroyed brick drops a power-up
    pub power_up_chance: f32,
    /// Fall speed in pixels per reference frame
    pub power_up_fall_speed: f32,
    pub power_up_size: f32,
    /// Extra balls spawned by multi-ball
    pub multi_ball_count: u32,
    /// Horizontal speed spread of multi-ball clones (dx in [-spread/2, spread/2))
    pub multi_ball_spread: f32,
    pub expand_step: f32,
    /// Paddle segment width cap as a fraction of field width
    pub max_paddle_fraction: f32,
    pub enlarge_step: f32,
    pub max_ball_radius: f32,
    pub max_segments: u32,
    /// Paddle flash duration after a pickup (seconds)
    pub flash_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            brick_rows: 6,
            brick_columns: 8,
            brick_padding: 10.0,
            brick_offset_top: 40.0,
            brick_offset_left: 10.0,
            brick_height: 25.0,
            brick_points: 10,

            paddle_width: 100.0,
            paddle_height: 15.0,
            paddle_gap: 20.0,
            paddle_bottom_margin: 30.0,

            ball_radius: 8.0,
            ball_speed: 3.0,
            starting_lives: 3,

            power_up_chance: 0.15,
            power_up_fall_speed: 2.0,
            power_up_size: 30.0,
            multi_ball_count: 3,
            multi_ball_spread: 8.0,
            expand_step: 40.0,
            max_paddle_fraction: 0.9,
            enlarge_step: 5.0,
            max_ball_radius: 40.0,
            max_segments: 8,
            flash_duration: 0.3,
        }
    }
}

/// Largest brick grid accepted (rows times columns)
pub const MAX_BRICKS: u32 = 4096;
/// Ball radius bounds, inclusive
pub const BALL_RADIUS_RANGE: (f32, f32) = (8.0, 40.0);
/// Segment caps the split effect can reach by doubling from one
const SEGMENT_CAPS: [u32; 4] = [1, 2, 4, 8];

impl GameConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.brick_rows == 0 {
            return invalid("brick_rows", "must be at least 1");
        }
        if self.brick_columns == 0 {
            return invalid("brick_columns", "must be at least 1");
        }
        match self.brick_rows.checked_mul(self.brick_columns) {
            Some(n) if n <= MAX_BRICKS => {}
            _ => return invalid("brick_rows", "grid exceeds MAX_BRICKS bricks"),
        }
        if self.brick_padding < 0.0 {
            return invalid("brick_padding", "must not be negative");
        }
        if self.brick_height <= 0.0 {
            return invalid("brick_height", "must be positive");
        }
        if self.paddle_width <= 0.0 || self.paddle_height <= 0.0 {
            return invalid("paddle_width", "paddle dimensions must be positive");
        }
        if self.paddle_gap < 0.0 {
            return invalid("paddle_gap", "must not be negative");
        }
        let (min_radius, max_radius) = BALL_RADIUS_RANGE;
        if !(min_radius..=max_radius).contains(&self.ball_radius) {
            return invalid("ball_radius", "must be within [8, 40]");
        }
        if !(self.ball_radius..=max_radius).contains(&self.max_ball_radius) {
            return invalid("max_ball_radius", "must be within [ball_radius, 40]");
        }
        if self.ball_speed <= 0.0 {
            return invalid("ball_speed", "must be positive");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return invalid("power_up_chance", "must be within [0, 1]");
        }
        if self.power_up_fall_speed <= 0.0 {
            return invalid("power_up_fall_speed", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.max_paddle_fraction) || self.max_paddle_fraction == 0.0 {
            return invalid("max_paddle_fraction", "must be within (0, 1]");
        }
        if !SEGMENT_CAPS.contains(&self.max_segments) {
            return invalid("max_segments", "must be 1, 2, 4 or 8");
        }
        if self.expand_step < 0.0 {
            return invalid("expand_step", "must not be negative");
        }
        if self.enlarge_step < 0.0 {
            return invalid("enlarge_step", "must not be negative");
        }
        if self.flash_duration < 0.0 {
            return invalid("flash_duration", "must not be negative");
        }
        Ok(())
    }

    /// Paddle segment width cap for a field width
    pub fn max_paddle_width(&self, field_width: f32) -> f32 {
        field_width * self.max_paddle_fraction
    }
}
