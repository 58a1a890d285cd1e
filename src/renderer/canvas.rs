//! Canvas 2D backend
//!
//! Replays `DrawCommand`s onto a `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{DrawCommand, Stroke};

/// Owns the 2D context of the game canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Acquire the 2D context from `canvas`
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Draw a full frame
    pub fn draw(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        for command in commands {
            self.draw_one(command)?;
        }
        Ok(())
    }

    fn draw_one(&self, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
            }
            DrawCommand::RoundedRect {
                pos,
                size,
                radius,
                fill,
                stroke,
            } => {
                self.rounded_rect_path(
                    pos.x as f64,
                    pos.y as f64,
                    size.x as f64,
                    size.y as f64,
                    *radius as f64,
                )?;
                ctx.set_fill_style_str(&fill.css());
                ctx.fill();
                if let Some(Stroke { color, width }) = stroke {
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke();
                }
            }
            DrawCommand::GlowCircle {
                center,
                radius,
                color,
                glow,
            } => {
                let css = color.css();
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                ctx.set_fill_style_str(&css);
                ctx.set_shadow_color(&css);
                ctx.set_shadow_blur(*glow as f64);
                ctx.fill();
                ctx.close_path();
                ctx.set_shadow_blur(0.0);
            }
            DrawCommand::Text {
                pos,
                text,
                font_px,
                color,
            } => {
                ctx.set_font(&format!("{}px serif", font_px));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.set_fill_style_str(&color.css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
        Ok(())
    }

    /// Trace a rounded rectangle; radius is clamped to half the short side
    fn rounded_rect_path(&self, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r)?;
        ctx.arc_to(x + w, y + h, x, y + h, r)?;
        ctx.arc_to(x, y + h, x, y, r)?;
        ctx.arc_to(x, y, x + w, y, r)?;
        ctx.close_path();
        Ok(())
    }
}
