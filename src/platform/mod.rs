//! Platform abstraction layer
//!
//! Browser-independent helpers for translating DOM input into simulation input.

pub mod input;

pub use input::{Key, KeyAction, key_action, pointer_to_field_x};
