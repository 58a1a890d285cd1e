//! Rendering module
//!
//! `scene` builds backend-agnostic draw commands from the game state;
//! `canvas` replays them on the browser's 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCommand, Stroke, compose};
