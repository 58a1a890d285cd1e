//! Argenoid - A breakout-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, power-ups, game state)
//! - `renderer`: Draw-command scene and the Canvas 2D backend
//! - `platform`: Browser input normalization
//! - `config`: Data-driven game balance
//! - `ui`: Overlay and HUD text derived from game state
//! - `driver`: Fixed-step frame clock
//! - `audio`: Web Audio cues (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod driver;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod ui;

pub use config::{ConfigError, GameConfig};
pub use driver::FrameClock;

/// Timing constants
pub mod consts {
    /// Reference frame rate. Velocities are expressed in pixels per reference frame.
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Fixed simulation timestep (one reference frame)
    pub const SIM_DT: f32 = 1.0 / REFERENCE_FPS;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame delta fed to the accumulator (tab switches, debugger stops)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
