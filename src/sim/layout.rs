//! Brick grid generation
//!
//! Bricks stretch to fill the field width between the side offsets, so the
//! grid is rebuilt whenever the field is resized outside of a run.

use glam::Vec2;

use super::state::{Brick, colors};
use crate::config::GameConfig;

/// Width of one brick for a field width
pub fn brick_width(config: &GameConfig, field_width: f32) -> f32 {
    let columns = config.brick_columns as f32;
    let usable = field_width
        - config.brick_offset_left * 2.0
        - (columns - 1.0) * config.brick_padding;
    (usable / columns).max(0.0)
}

/// Build a full grid of live bricks, column-major, with alternating row stripes
pub fn build_bricks(config: &GameConfig, field_width: f32) -> Vec<Brick> {
    let width = brick_width(config, field_width);
    let height = config.brick_height;

    let mut bricks = Vec::with_capacity(config.brick_rows as usize * config.brick_columns as usize);
    for column in 0..config.brick_columns {
        for row in 0..config.brick_rows {
            let x = column as f32 * (width + config.brick_padding) + config.brick_offset_left;
            let y = row as f32 * (height + config.brick_padding) + config.brick_offset_top;
            bricks.push(Brick {
                row,
                column,
                pos: Vec2::new(x, y),
                size: Vec2::new(width, height),
                alive: true,
                color: if row % 2 == 0 {
                    colors::CELESTE
                } else {
                    colors::WHITE
                },
            });
        }
    }

    log::debug!(
        "Built {}x{} brick grid ({:.1}px bricks)",
        config.brick_columns,
        config.brick_rows,
        width
    );
    bricks
}
