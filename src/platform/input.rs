//! Pointer and keyboard mapping
//!
//! DOM event handlers pass raw numbers here so the mapping can be tested natively.

/// Map a pointer's client x-coordinate to field space
///
/// `rect_left` and `rect_width` come from the canvas bounding rect in CSS
/// pixels; `canvas_width` is the canvas backing width. Returns `None` when
/// the canvas has no layout width yet or the pointer is off the canvas.
pub fn pointer_to_field_x(
    client_x: f32,
    rect_left: f32,
    rect_width: f32,
    canvas_width: f32,
) -> Option<f32> {
    if rect_width <= 0.0 {
        return None;
    }
    let x = (client_x - rect_left) * canvas_width / rect_width;
    (x > 0.0 && x < canvas_width).then_some(x)
}

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Start,
    Pause,
    Autopilot,
}

/// What a key press does to the tick input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Key),
    Ignore,
}

/// Decode a `KeyboardEvent.key` value
pub fn key_action(key: &str) -> KeyAction {
    match key {
        " " | "Enter" => KeyAction::Press(Key::Start),
        "Escape" | "p" | "P" => KeyAction::Press(Key::Pause),
        "i" | "I" => KeyAction::Press(Key::Autopilot),
        _ => KeyAction::Ignore,
    }
}
