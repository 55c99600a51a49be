//! Canvas 2D wheel painter

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::layout::WheelLayout;
use crate::consts::*;
use crate::wheel::PrizeSet;

/// Colors for wheel decorations
pub mod colors {
    pub const RIM: &str = "#fff";
    pub const INNER_RING: &str = "rgba(0,0,0,0.1)";
    pub const WEDGE_EDGE: &str = "rgba(255,255,255,0.6)";
    pub const LABEL: &str = "#fff";
    pub const LABEL_SHADOW: &str = "rgba(0,0,0,0.3)";
    pub const HUB: &str = "#fff";
    pub const HUB_SHADOW: &str = "rgba(0,0,0,0.2)";
    pub const POINTER: &str = "#FBBF24"; // amber-400
}

const LABEL_FONT: &str = "bold 24px \"Noto Sans SC\", sans-serif";

/// Paints the wheel onto a canvas element
pub struct WheelCanvas {
    ctx: CanvasRenderingContext2d,
}

impl WheelCanvas {
    /// Attach to a canvas; None if it has no 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(WHEEL_SIZE as u32);
        canvas.set_height(WHEEL_SIZE as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    /// Repaint the whole wheel at `rotation`
    pub fn render(&self, prizes: &PrizeSet, rotation: f64) {
        let ctx = &self.ctx;
        let layout = WheelLayout::new(prizes, rotation);
        let (cx, cy) = (layout.center.x, layout.center.y);
        let radius = layout.radius;

        ctx.clear_rect(0.0, 0.0, WHEEL_SIZE, WHEEL_SIZE);

        // Sectors
        for wedge in &layout.wedges {
            ctx.begin_path();
            ctx.move_to(cx, cy);
            let _ = ctx.arc(cx, cy, radius, wedge.start, wedge.end);
            ctx.close_path();
            ctx.set_fill_style_str(&wedge.color);
            ctx.fill();
            ctx.set_line_width(1.0);
            ctx.set_stroke_style_str(colors::WEDGE_EDGE);
            ctx.stroke();

            // Label along the bisector, right-aligned at the anchor
            ctx.save();
            let _ = ctx.translate(wedge.label_anchor.x, wedge.label_anchor.y);
            let _ = ctx.rotate(wedge.label_angle);
            ctx.set_text_align("right");
            ctx.set_fill_style_str(colors::LABEL);
            ctx.set_font(LABEL_FONT);
            ctx.set_shadow_color(colors::LABEL_SHADOW);
            ctx.set_shadow_blur(2.0);
            let _ = ctx.fill_text(&wedge.label, 0.0, 10.0);
            ctx.restore();
        }

        // Outer rim
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
        ctx.set_line_width(12.0);
        ctx.set_stroke_style_str(colors::RIM);
        ctx.stroke();

        // Inner ring decoration
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, radius - 5.0, 0.0, std::f64::consts::TAU);
        ctx.set_line_width(2.0);
        ctx.set_stroke_style_str(colors::INNER_RING);
        ctx.stroke();

        // Center hub
        ctx.save();
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, HUB_RADIUS, 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str(colors::HUB);
        ctx.set_shadow_color(colors::HUB_SHADOW);
        ctx.set_shadow_blur(5.0);
        ctx.fill();
        ctx.restore();

        // Fixed pointer at the top, tip resting on the rim
        let tip = layout.pointer_tip;
        ctx.begin_path();
        ctx.move_to(tip.x, tip.y + 12.0);
        ctx.line_to(tip.x - 15.0, tip.y - 18.0);
        ctx.line_to(tip.x + 15.0, tip.y - 18.0);
        ctx.close_path();
        ctx.set_fill_style_str(colors::POINTER);
        ctx.fill();
    }
}
