//! Collision tests for the rectangular field
//!
//! All tests look one step ahead: they take the ball's position after the
//! pending displacement and report what it would touch, leaving the response
//! to the tick.

use glam::Vec2;

use super::state::Paddle;

/// Walls a ball would cross on its next step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall
    pub side: bool,
    /// Ceiling
    pub top: bool,
}

/// Outcome of the paddle plane test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleContact {
    /// Ball stays above the paddle plane
    Clear,
    /// Ball lands on a segment; `offset` is -1 (left end) to +1 (right end)
    Hit { offset: f32 },
    /// Ball is below the paddle plane, between or beside segments, still in the field
    Passing,
    /// Ball leaves through the bottom of the field
    Lost,
}

/// Strict point-in-rectangle test (edges excluded)
#[inline]
pub fn point_in_rect(point: Vec2, top_left: Vec2, size: Vec2) -> bool {
    point.x > top_left.x
        && point.x < top_left.x + size.x
        && point.y > top_left.y
        && point.y < top_left.y + size.y
}

/// Check the field walls against the ball's next position
pub fn ball_wall_contact(next: Vec2, radius: f32, field_width: f32) -> WallContact {
    WallContact {
        side: next.x > field_width - radius || next.x < radius,
        top: next.y < radius,
    }
}

/// Normalized hit position across the whole segment cluster
///
/// Linear ramp from -1 at the cluster's left edge to +1 at its right edge.
pub fn hit_offset(x: f32, paddle: &Paddle) -> f32 {
    let half = paddle.total_width() / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    (x - paddle.center_x()) / half
}

/// Check the paddle plane and field bottom
///
/// Horizontal coverage uses the ball's current `x`; the plane crossing uses
/// the next `y`. The ball only counts as lost once it would pass the field
/// bottom without landing on a segment.
pub fn ball_paddle_contact(
    x: f32,
    next_y: f32,
    radius: f32,
    paddle: &Paddle,
    field_height: f32,
) -> PaddleContact {
    if next_y <= paddle.pos.y - radius {
        return PaddleContact::Clear;
    }
    if paddle.covers(x) {
        PaddleContact::Hit {
            offset: hit_offset(x, paddle),
        }
    } else if next_y > field_height - radius {
        PaddleContact::Lost
    } else {
        PaddleContact::Passing
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
