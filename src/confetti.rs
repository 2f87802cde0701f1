//! Falling confetti for the surprise modal.
//!
//! [`ConfettiField`] is plain simulation state; the canvas painter lives
//! behind `wasm32` and only reads it.

use rand::Rng;

pub const CONFETTI_COUNT: usize = 100;
pub const CONFETTI_COLORS: [&str; 6] = [
    "#ff9a9e", "#fad0c4", "#fbc2eb", "#a18cd1", "#ff6b9d", "#c2e9fb",
];
/// Where recycled pieces re-enter, just above the top edge.
const REENTRY_Y: f64 = -20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub color: &'static str,
    /// Degrees
    pub rotation: f64,
    pub rotation_speed: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
}

impl ConfettiPiece {
    fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen::<f64>() * width,
            y: rng.gen::<f64>() * height - height,
            w: rng.gen_range(5.0..15.0),
            h: rng.gen_range(5.0..10.0),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
            rotation: rng.gen_range(0.0..360.0),
            rotation_speed: rng.gen_range(-2.5..2.5),
            velocity_x: rng.gen_range(-1.0..1.0),
            velocity_y: rng.gen_range(2.0..5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiField {
    pub width: f64,
    pub height: f64,
    pub pieces: Vec<ConfettiPiece>,
}

impl ConfettiField {
    /// Scatter `count` pieces in the band just above a `width` x `height` canvas.
    pub fn new<R: Rng>(rng: &mut R, width: f64, height: f64, count: usize) -> Self {
        let pieces = (0..count)
            .map(|_| ConfettiPiece::random(rng, width, height))
            .collect();
        Self {
            width,
            height,
            pieces,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Advance one frame. Pieces that fall off the bottom re-enter at the top.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        for piece in &mut self.pieces {
            piece.y += piece.velocity_y;
            piece.x += piece.velocity_x;
            piece.rotation += piece.rotation_speed;

            if piece.y > self.height {
                piece.y = REENTRY_Y;
                piece.x = rng.gen::<f64>() * self.width;
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod canvas {
    use super::ConfettiField;
    use wasm_bindgen::JsCast;
    use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

    pub fn context(canvas_id: &str) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas: HtmlCanvasElement = window()?
            .document()?
            .get_element_by_id(canvas_id)?
            .dyn_into()
            .ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some((canvas, ctx))
    }

    pub fn viewport_size() -> Option<(f64, f64)> {
        let win = window()?;
        let width = win.inner_width().ok()?.as_f64()?;
        let height = win.inner_height().ok()?.as_f64()?;
        Some((width, height))
    }

    pub fn fit(canvas: &HtmlCanvasElement, width: f64, height: f64) {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }

    pub fn paint(ctx: &CanvasRenderingContext2d, field: &ConfettiField) {
        ctx.clear_rect(0.0, 0.0, field.width, field.height);
        for piece in &field.pieces {
            ctx.save();
            let _ = ctx.translate(piece.x, piece.y);
            let _ = ctx.rotate(piece.rotation.to_radians());
            ctx.set_fill_style_str(piece.color);
            ctx.fill_rect(-piece.w / 2.0, -piece.h / 2.0, piece.w, piece.h);
            ctx.restore();
        }
    }
}
