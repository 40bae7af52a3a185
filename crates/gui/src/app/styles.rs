//! Application style configuration

use eframe::egui;

/// Accent used for selection highlights in panels
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

/// Configure initial application styles with given font size
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();

    // Dark theme with deep-space panels
    style.visuals = egui::Visuals::dark();
    style.visuals.panel_fill = egui::Color32::from_rgb(17, 20, 32);
    style.visuals.window_fill = egui::Color32::from_rgb(22, 26, 40);
    style.visuals.extreme_bg_color = egui::Color32::from_rgb(10, 12, 22);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(26, 30, 46);
    style.visuals.selection.bg_fill = ACCENT.gamma_multiply(0.6);
    style.visuals.hyperlink_color = ACCENT;

    style.visuals.window_corner_radius = egui::CornerRadius::same(8);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(6);
    for widget in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = egui::CornerRadius::same(4);
    }

    style.spacing.item_spacing = egui::vec2(6.0, 5.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);
    style.spacing.menu_margin = egui::Margin::same(6);

    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

/// Apply font size to all text styles
pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    let sizes = [
        (egui::TextStyle::Body, egui::FontId::proportional(font_size)),
        (egui::TextStyle::Button, egui::FontId::proportional(font_size)),
        (egui::TextStyle::Small, egui::FontId::proportional(font_size * 0.85)),
        (egui::TextStyle::Heading, egui::FontId::proportional(font_size * 1.25)),
        (egui::TextStyle::Monospace, egui::FontId::monospace(font_size * 0.95)),
    ];
    style.text_styles.extend(sizes);
}
