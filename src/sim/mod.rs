//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit `dt` only, no clocks
//! - Injected randomness only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod powerup;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{PaddleContact, WallContact, point_in_rect, reflect_velocity};
pub use layout::build_bricks;
pub use rng::{RandomSource, SequenceRng, seeded};
pub use state::{
    Ball, Brick, Color, Field, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind,
    SoundEffect, colors,
};
pub use tick::{TickInput, resize, start, tick};
