//! System viewport: feeds pointer input into the view and paints the frame

pub use starforge_gui_lib::viewport::{camera, frame, interaction, picking, visuals};

use egui::load::SizedTexture;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use glam::DVec2;

use crate::i18n::t;
use crate::sprites::SpriteResolver;
use crate::state::AppState;
use frame::{DrawCommand, FrameParams, RenderEngine, RenderFrame};
use interaction::{apply_event, ViewportEvent};

pub struct ViewportPanel {
    engine: RenderEngine,
    last_frame: Option<RenderFrame>,
    /// Pan accumulated by the drag in progress
    drag_offset: DVec2,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            engine: RenderEngine::new(),
            last_frame: None,
            drag_offset: DVec2::ZERO,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState, sprites: &mut SpriteResolver) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let size = DVec2::new(rect.width() as f64, rect.height() as f64);
        let local = |pos: Pos2| DVec2::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);

        // ── Input against the frame the user was looking at ─────
        let mut events = Vec::new();
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            self.drag_offset += DVec2::new(delta.x as f64, delta.y as f64);
        }
        if response.drag_stopped() {
            events.push(ViewportEvent::DragEnd {
                offset: std::mem::take(&mut self.drag_offset),
            });
        }
        if let Some(pos) = response.interact_pointer_pos() {
            if response.double_clicked() {
                events.push(ViewportEvent::DoubleClick { pos: local(pos) });
            } else if response.clicked() {
                events.push(ViewportEvent::Click { pos: local(pos) });
            }
        }
        if let Some(pos) = response.hover_pos() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y) as f64;
            if scroll.abs() > 0.1 {
                let notches = scroll / state.settings.viewport.wheel_notch_pixels;
                events.push(ViewportEvent::Wheel {
                    pos: local(pos),
                    notches,
                });
            }
        }

        if let Some(last) = self.last_frame.as_ref() {
            let step = state.settings.viewport.wheel_zoom_step;
            for event in events {
                apply_event(&mut state.view, last, size * 0.5, step, event);
            }
        }

        // ── Build ─────────────────────────────────────
        state.sync_system_identity();
        let mut params = FrameParams::new(size, &state.settings.viewport);
        params.drag_offset = self.drag_offset;
        let frame = self.engine.frame(
            &state.system,
            &mut state.view,
            &state.animator,
            sprites,
            &params,
        );

        // ── Paint ─────────────────────────────────────
        if ui.is_rect_visible(rect) {
            let [r, g, b] = state.settings.viewport.background_color;
            ui.painter().rect_filled(rect, 0.0, Color32::from_rgb(r, g, b));
            paint(ui, rect, &frame);
        }
        self.last_frame = Some(frame);
    }
}

fn paint(ui: &Ui, rect: Rect, frame: &RenderFrame) {
    let painter = ui.painter_at(rect);
    let to_screen = |p: DVec2| Pos2::new(rect.min.x + p.x as f32, rect.min.y + p.y as f32);

    for command in &frame.commands {
        match command {
            DrawCommand::Ring {
                center,
                radius,
                width,
                color,
                ..
            } => {
                painter.circle_stroke(
                    to_screen(*center),
                    *radius as f32,
                    Stroke::new(*width as f32, *color),
                );
            }
            DrawCommand::Disc {
                center,
                radius,
                color,
                ..
            } => {
                painter.circle_filled(to_screen(*center), *radius as f32, *color);
            }
            DrawCommand::Sprite {
                texture,
                center,
                size,
                rotation_deg,
                ..
            } => {
                let extent = Vec2::splat(*size as f32);
                let sprite_rect = Rect::from_center_size(to_screen(*center), extent);
                if !rect.intersects(sprite_rect) {
                    continue;
                }
                egui::Image::from_texture(SizedTexture::new(*texture, extent))
                    .rotate(rotation_deg.to_radians() as f32, Vec2::splat(0.5))
                    .paint_at(ui, sprite_rect);
            }
            DrawCommand::Placeholder { .. } => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    t("viewport.placeholder"),
                    egui::FontId::proportional(16.0),
                    Color32::from_gray(140),
                );
            }
        }
    }
}
