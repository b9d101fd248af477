//! Canvas2D scene painter
//!
//! Reads plain data off the sim after each tick and draws it. Nothing in
//! here feeds back into gameplay; `size` on an item is a simulation unit,
//! never measured from what was drawn.

use std::f64::consts::{PI, TAU};

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::local_to_world;
use crate::sim::{GameState, LooseBlock, ShapeKind, Side, StackedItem};

/// Retro sunset palette
mod palette {
    pub const SKY_TOP: &str = "#f5b36a";
    pub const SKY_BOTTOM: &str = "#6a4e9c";
    pub const SUN: &str = "#ffe8a5";
    pub const HORIZON: &str = "#4c2f66";
    pub const GROUND: &str = "#1a132d";
    pub const FRAME: &str = "#2b1d40";
    pub const LANE_DUCK: &str = "rgba(255, 215, 137, 0.15)";
    pub const LANE_JAM: &str = "rgba(255, 140, 116, 0.15)";
    pub const DUCK: &str = "#ffd789";
    pub const DUCK_BEAK: &str = "#c55b50";
    pub const JAM: &str = "#ff8c74";
    pub const JAM_LID: &str = "#2b1d40";
    pub const DIAL_FACE: &str = "#fff6df";
    pub const DIAL_NEEDLE: &str = "#9f3c35";
}

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Draw one frame of the current game state
    pub fn render(&self, state: &GameState, reduced_motion: bool, show_dial: bool) {
        self.draw_background();
        self.draw_lanes(state);
        self.draw_scale(state, show_dial);
        for item in &state.falling {
            self.draw_shape(item.kind, item.size, item.pos, 0.0);
        }
        for block in &state.debris {
            self.draw_loose_block(block, reduced_motion);
        }
    }

    fn draw_background(&self) {
        let ctx = &self.ctx;
        let horizon_y = self.height * 0.78;

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, horizon_y);
        let _ = gradient.add_color_stop(0.0, palette::SKY_TOP);
        let _ = gradient.add_color_stop(1.0, palette::SKY_BOTTOM);
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, self.width, horizon_y);

        // Low sun on the horizon
        ctx.set_fill_style_str(palette::SUN);
        ctx.begin_path();
        let _ = ctx.arc(self.width * 0.72, horizon_y - 40.0, 46.0, 0.0, TAU);
        ctx.fill();

        ctx.set_fill_style_str(palette::HORIZON);
        ctx.fill_rect(0.0, horizon_y, self.width, 14.0);
        ctx.set_fill_style_str(palette::GROUND);
        ctx.fill_rect(0.0, horizon_y + 14.0, self.width, self.height - horizon_y - 14.0);
    }

    /// Tinted bands under each pan hint which kind belongs where
    fn draw_lanes(&self, state: &GameState) {
        let ctx = &self.ctx;
        for (side, color) in [(Side::Left, palette::LANE_DUCK), (Side::Right, palette::LANE_JAM)] {
            let pan = local_to_world(
                state.scale_pos,
                state.scale_rotation,
                Vec2::new(side.pan_x(), PAN_ANCHOR_Y),
            );
            let band = (PAN_RADIUS * 2.2) as f64;
            ctx.set_fill_style_str(color);
            ctx.fill_rect(pan.x as f64 - band / 2.0, 0.0, band, self.height);
        }
    }

    fn draw_scale(&self, state: &GameState, show_dial: bool) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(state.scale_pos.x as f64, state.scale_pos.y as f64);
        let _ = ctx.rotate(state.scale_rotation as f64);

        let offset = PAN_OFFSET as f64;
        let radius = PAN_RADIUS as f64;
        let anchor = PAN_ANCHOR_Y as f64;

        // Center post down to the baseline
        ctx.set_fill_style_str(palette::FRAME);
        ctx.fill_rect(-5.0, 0.0, 10.0, (SCALE_BASELINE_OFFSET - 8.0) as f64);
        ctx.fill_rect(-34.0, (SCALE_BASELINE_OFFSET - 12.0) as f64, 68.0, 10.0);

        // Beam
        ctx.fill_rect(-offset, -3.0, offset * 2.0, 6.0);

        for side_x in [-offset, offset] {
            // Hanger
            ctx.set_stroke_style_str(palette::FRAME);
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.move_to(side_x, 0.0);
            ctx.line_to(side_x, anchor);
            ctx.stroke();

            // Tray bowl
            ctx.begin_path();
            let _ = ctx.arc(side_x, anchor, radius, 0.0, PI);
            ctx.set_fill_style_str(palette::FRAME);
            ctx.fill();
            ctx.fill_rect(side_x - radius * 1.025 - 2.0, anchor - 3.0, radius * 2.05 + 4.0, 6.0);
        }

        // Stacked items tilt with the beam
        for side in [Side::Left, Side::Right] {
            for item in state.stacks.items(side) {
                self.draw_stacked(item);
            }
        }

        if show_dial {
            self.draw_dial(state.dial_rotation as f64);
        }

        ctx.restore();
    }

    fn draw_dial(&self, needle_rotation: f64) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(palette::DIAL_FACE);
        ctx.begin_path();
        let _ = ctx.arc(0.0, -16.0, 12.0, 0.0, TAU);
        ctx.fill();

        ctx.save();
        let _ = ctx.translate(0.0, -16.0);
        let _ = ctx.rotate(needle_rotation);
        ctx.set_stroke_style_str(palette::DIAL_NEEDLE);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(0.0, 2.0);
        ctx.line_to(0.0, -10.0);
        ctx.stroke();
        ctx.restore();
    }

    fn draw_stacked(&self, item: &StackedItem) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(item.offset.x as f64, item.offset.y as f64);
        let _ = ctx.rotate(item.rotation as f64);
        self.draw_shape_local(item.kind, item.size as f64);
        ctx.restore();
    }

    fn draw_loose_block(&self, block: &LooseBlock, reduced_motion: bool) {
        let rotation = if reduced_motion { 0.0 } else { block.rotation };
        self.draw_shape(block.kind, block.size, block.pos, rotation);
    }

    fn draw_shape(&self, kind: ShapeKind, size: f32, pos: Vec2, rotation: f32) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(pos.x as f64, pos.y as f64);
        let _ = ctx.rotate(rotation as f64);
        self.draw_shape_local(kind, size as f64);
        ctx.restore();
    }

    /// Draw a shape centered on the current origin
    fn draw_shape_local(&self, kind: ShapeKind, size: f64) {
        let ctx = &self.ctx;
        let half = size / 2.0;
        match kind {
            ShapeKind::Duck => {
                // Body, head, beak
                ctx.set_fill_style_str(palette::DUCK);
                ctx.begin_path();
                let _ = ctx.ellipse(0.0, half * 0.25, half, half * 0.7, 0.0, 0.0, TAU);
                ctx.fill();
                ctx.begin_path();
                let _ = ctx.arc(half * 0.5, -half * 0.35, half * 0.42, 0.0, TAU);
                ctx.fill();
                ctx.set_fill_style_str(palette::DUCK_BEAK);
                ctx.begin_path();
                ctx.move_to(half * 0.88, -half * 0.4);
                ctx.line_to(half * 1.25, -half * 0.28);
                ctx.line_to(half * 0.88, -half * 0.16);
                ctx.close_path();
                ctx.fill();
            }
            ShapeKind::Jam => {
                // Jar with a lid band
                ctx.set_fill_style_str(palette::JAM);
                ctx.fill_rect(-half * 0.8, -half * 0.7, half * 1.6, half * 1.7);
                ctx.set_fill_style_str(palette::JAM_LID);
                ctx.fill_rect(-half * 0.9, -half, half * 1.8, half * 0.35);
            }
        }
    }
}
