use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState, busy: bool) {
    ui.horizontal(|ui| {
        let Some(name) = state.system.system_name() else {
            ui.weak(t("status.no_system"));
            return;
        };
        ui.strong(name);

        ui.separator();
        ui.weak(format!("{}: {}", t("status.bodies"), state.system.body_count()));

        ui.separator();
        ui.weak(format!(
            "{}: {:.2}×",
            t("status.zoom"),
            state.view.computed_zoom()
        ));

        if let Some(target) = state.view.focus_target() {
            ui.separator();
            ui.label(format!("{}: {}", t("status.following"), target.id));
        } else if let Some(id) = state.view.selected_id() {
            ui.separator();
            ui.label(format!("{}: {id}", t("status.selected")));
        }

        if !state.view.is_animating {
            ui.separator();
            ui.weak(t("status.paused"));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if state.settings.storage.local_mode {
                ui.weak(t("status.local"));
                ui.separator();
            }
            if busy {
                ui.spinner();
                ui.weak(t("status.busy"));
                ui.separator();
            }
            if state.system.is_dirty() {
                ui.colored_label(egui::Color32::from_rgb(230, 180, 80), t("status.unsaved"));
            } else {
                ui.weak(t("status.saved"));
            }
        });
    });
}
