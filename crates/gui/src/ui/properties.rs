//! Properties panel for the selected body and the system itself
//!
//! Text and numeric fields keep their own edit buffer and commit when they lose
//! focus, so every commit is a single store mutation. Numeric fields accept
//! arithmetic expressions.

use std::collections::HashMap;

use egui::Ui;
use shared::{BodyKind, StationType};

use crate::helpers::{format_number, parse_number_field, selected_body};
use crate::i18n::t;
use crate::state::system::type_label;
use crate::state::{body_display_name, AppState, BodyPatch};
use starforge_gui_lib::viewport::visuals;

/// Edit buffers of the panel, valid for one body at one store version
#[derive(Default)]
pub struct FieldBuffers {
    owner: Option<(String, u64)>,
    texts: HashMap<&'static str, String>,
    errors: HashMap<&'static str, String>,
}

impl FieldBuffers {
    fn sync(&mut self, owner: &str, version: u64) {
        let current = self.owner.as_ref().map(|(id, v)| (id.as_str(), *v));
        if current != Some((owner, version)) {
            self.owner = Some((owner.to_string(), version));
            self.texts.clear();
            self.errors.clear();
        }
    }
}

pub fn show(ui: &mut Ui, state: &mut AppState, buffers: &mut FieldBuffers, sprites: &[String]) {
    ui.heading(t("prop.title"));
    ui.separator();

    let Some(body) = selected_body(state).cloned() else {
        if state.system.has_system() {
            system_section(ui, state, buffers);
        }
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("prop.select_body"));
        });
        return;
    };

    buffers.sync(&body.id, state.system.version());
    let mut patch = BodyPatch::default();
    let mut reset_appearance = false;

    ui.horizontal(|ui| {
        ui.strong(crate::state::body_icon(&body));
        ui.strong(body_display_name(&body));
    });
    ui.add_space(4.0);

    egui::CollapsingHeader::new(t("prop.general"))
        .id_salt("prop_general")
        .default_open(true)
        .show(ui, |ui| {
            egui::Grid::new("prop_general_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label(t("prop.id"));
                    ui.monospace(&body.id);
                    ui.end_row();

                    ui.label(t("prop.type"));
                    ui.label(type_label(body.body_type()));
                    ui.end_row();

                    ui.label(t("prop.name"));
                    patch.name = text_field(ui, buffers, "name", &body.name);
                    ui.end_row();

                    ui.label(t("prop.sprite"));
                    patch.sprite = sprite_picker(ui, &body.sprite, sprites);
                    ui.end_row();

                    ui.label(t("prop.scale"));
                    patch.scale = number_field(ui, buffers, "scale", body.scale);
                    ui.end_row();

                    ui.label(t("prop.rotation"));
                    patch.rotation = number_field(ui, buffers, "rotation", body.rotation);
                    ui.end_row();

                    ui.label(t("prop.rotation_speed"));
                    patch.rotation_speed =
                        number_field(ui, buffers, "rotation_speed", body.rotation_speed);
                    ui.end_row();

                    patch.kind = kind_fields(ui, buffers, &body.kind);
                });

            ui.label(t("prop.description"));
            patch.description = description_field(ui, buffers, &body.description);
        });

    if !body.is_root() || body.orbit_distance > 0.0 || body.is_ring_only == Some(true) {
        egui::CollapsingHeader::new(t("prop.orbit"))
            .id_salt("prop_orbit")
            .default_open(true)
            .show(ui, |ui| {
                egui::Grid::new("prop_orbit_grid")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(t("prop.orbit_distance"));
                        patch.orbit_distance =
                            number_field(ui, buffers, "orbit_distance", body.orbit_distance);
                        ui.end_row();

                        ui.label(t("prop.orbit_speed"));
                        patch.orbit_speed =
                            number_field(ui, buffers, "orbit_speed", body.orbit_speed);
                        ui.end_row();

                        ui.label(t("prop.orbit_angle"));
                        patch.orbit_angle =
                            number_field(ui, buffers, "orbit_angle", body.orbit_angle);
                        ui.end_row();
                    });
            });
    }

    egui::CollapsingHeader::new(t("prop.appearance"))
        .id_salt("prop_appearance")
        .default_open(false)
        .show(ui, |ui| {
            let visual = visuals::resolve(&body);
            egui::Grid::new("prop_appearance_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label(t("prop.base_size"));
                    patch.base_size = number_field(ui, buffers, "base_size", visual.base_size);
                    ui.end_row();

                    ui.label(t("prop.fill"));
                    patch.fallback_color =
                        color_field(ui, body.fallback_color.as_deref(), visual.fill);
                    ui.end_row();

                    ui.label(t("prop.ring_color"));
                    patch.orbit_ring_color =
                        color_field(ui, body.orbit_ring_color.as_deref(), visual.ring_color);
                    ui.end_row();

                    ui.label(t("prop.ring_width"));
                    patch.orbit_ring_width =
                        number_field(ui, buffers, "ring_width", visual.ring_width);
                    ui.end_row();

                    ui.label(t("prop.ring_only"));
                    let mut ring_only = visual.ring_only;
                    if ui.checkbox(&mut ring_only, "").changed() {
                        patch.is_ring_only = Some(ring_only);
                    }
                    ui.end_row();
                });
            if ui.small_button(t("prop.default")).clicked() {
                reset_appearance = true;
            }
        });

    show_errors(ui, buffers);

    if reset_appearance {
        let mut cleared = body.clone();
        cleared.base_size = None;
        cleared.fallback_color = None;
        cleared.orbit_ring_color = None;
        cleared.orbit_ring_width = None;
        cleared.is_ring_only = None;
        if let Err(e) = state.system.replace_body(cleared) {
            state.notifications.error(e.to_string());
        }
    } else if !patch.is_empty() {
        if let Err(e) = state.system.update_body(&body.id, patch) {
            tracing::warn!("Rejected edit of {}: {}", body.id, e);
            state.notifications.error(e.to_string());
        }
    }
}

/// System name and bounds, shown while nothing is selected
fn system_section(ui: &mut Ui, state: &mut AppState, buffers: &mut FieldBuffers) {
    let Some(system) = state.system.system().cloned() else {
        return;
    };
    buffers.sync(&system.id, state.system.version());

    let mut name = None;
    let mut bounds = system.bounds;
    let mut bounds_changed = false;

    egui::CollapsingHeader::new(t("prop.system"))
        .id_salt("prop_system")
        .default_open(true)
        .show(ui, |ui| {
            egui::Grid::new("prop_system_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label(t("prop.name"));
                    name = text_field(ui, buffers, "system_name", &system.name);
                    ui.end_row();

                    ui.label(t("prop.bounds"));
                    ui.horizontal(|ui| {
                        if let Some(w) = number_field(ui, buffers, "bounds_w", bounds.width) {
                            bounds.width = w;
                            bounds_changed = true;
                        }
                        ui.label("×");
                        if let Some(h) = number_field(ui, buffers, "bounds_h", bounds.height) {
                            bounds.height = h;
                            bounds_changed = true;
                        }
                    });
                    ui.end_row();
                });
        });
    show_errors(ui, buffers);

    let result = match (name, bounds_changed) {
        (Some(name), _) => state.system.set_system_name(&name),
        (None, true) => state.system.set_bounds(bounds),
        (None, false) => Ok(()),
    };
    if let Err(e) = result {
        state.notifications.error(e.to_string());
    }
}

/// Payload fields: star luminosity, station type
fn kind_fields(ui: &mut Ui, buffers: &mut FieldBuffers, kind: &BodyKind) -> Option<BodyKind> {
    match kind {
        BodyKind::Star {
            star_letter,
            luminosity,
        } => {
            ui.label(t("prop.luminosity"));
            let changed = number_field(ui, buffers, "luminosity", *luminosity);
            ui.end_row();
            changed.map(|luminosity| BodyKind::Star {
                star_letter: star_letter.clone(),
                luminosity,
            })
        }
        BodyKind::Station { station_type } => {
            ui.label(t("prop.station_type"));
            let mut selected = *station_type;
            egui::ComboBox::from_id_salt("station_type")
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for option in StationType::ALL {
                        ui.selectable_value(&mut selected, option, option.label());
                    }
                });
            ui.end_row();
            (selected != *station_type).then_some(BodyKind::Station {
                station_type: selected,
            })
        }
        _ => None,
    }
}

fn text_field(
    ui: &mut Ui,
    buffers: &mut FieldBuffers,
    key: &'static str,
    current: &str,
) -> Option<String> {
    let text = buffers
        .texts
        .entry(key)
        .or_insert_with(|| current.to_string());
    let response = ui.add(egui::TextEdit::singleline(text).desired_width(160.0));
    if response.lost_focus() && text.as_str() != current {
        let value = text.trim().to_string();
        if !value.is_empty() {
            return Some(value);
        }
        *text = current.to_string();
    }
    None
}

fn description_field(ui: &mut Ui, buffers: &mut FieldBuffers, current: &str) -> Option<String> {
    let text = buffers
        .texts
        .entry("description")
        .or_insert_with(|| current.to_string());
    let response = ui.add(
        egui::TextEdit::multiline(text)
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .char_limit(shared::MAX_DESCRIPTION_LEN),
    );
    (response.lost_focus() && text.as_str() != current).then(|| text.clone())
}

/// Numeric field with expression support. Returns the new value once the
/// field loses focus with a valid, different value.
fn number_field(
    ui: &mut Ui,
    buffers: &mut FieldBuffers,
    key: &'static str,
    current: f64,
) -> Option<f64> {
    let text = buffers
        .texts
        .entry(key)
        .or_insert_with(|| format_number(current));
    let response = ui
        .add(egui::TextEdit::singleline(text).desired_width(90.0))
        .on_hover_text(t("prop.expr_hint"));
    if !response.lost_focus() {
        return None;
    }
    match parse_number_field(text) {
        Ok(value) => {
            buffers.errors.remove(key);
            (value != current).then_some(value)
        }
        Err(e) => {
            buffers.errors.insert(key, format!("{key}: {e}"));
            None
        }
    }
}

fn color_field(ui: &mut Ui, stored: Option<&str>, resolved: egui::Color32) -> Option<String> {
    let mut rgba = visuals::editable_rgba(stored, resolved);
    ui.color_edit_button_srgba_unmultiplied(&mut rgba)
        .changed()
        .then(|| visuals::format_color(rgba))
}

fn sprite_picker(ui: &mut Ui, current: &str, sprites: &[String]) -> Option<String> {
    let mut selected = current.to_string();
    let shown = if current.is_empty() {
        t("prop.no_sprite")
    } else {
        current
    };
    egui::ComboBox::from_id_salt("sprite_picker")
        .selected_text(shown)
        .width(160.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, String::new(), t("prop.no_sprite"));
            if !current.is_empty() && !sprites.iter().any(|s| s == current) {
                ui.selectable_value(&mut selected, current.to_string(), current);
            }
            for sprite in sprites {
                ui.selectable_value(&mut selected, sprite.clone(), sprite);
            }
        });
    (selected != current).then_some(selected)
}

fn show_errors(ui: &mut Ui, buffers: &FieldBuffers) {
    let mut errors: Vec<&String> = buffers.errors.values().collect();
    errors.sort();
    for error in errors {
        ui.colored_label(egui::Color32::from_rgb(230, 100, 100), error);
    }
}
