//! Hierarchy panel: the body tree with per-body add and delete actions

use egui::Ui;
use shared::CelestialBody;

use crate::helpers::{add_actions_for, can_delete, perform_add, AddAction};
use crate::i18n::t;
use crate::state::system::body_sublabel;
use crate::state::{body_display_name, body_icon, AppState};

/// Action picked in the tree this frame; applied after the tree is drawn
enum TreeAction {
    Select(String),
    Focus(String),
    Add(String, AddAction),
    Delete(String),
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.heading(t("tree.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let count = state.system.body_count();
            ui.weak(format!("({count})"));
        });
    });
    ui.separator();

    let Some(system_name) = state.system.system_name().map(str::to_owned) else {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("tree.no_system"));
            ui.add_space(4.0);
            if ui.button(t("tree.new_system")).clicked() {
                state.dialogs.new_system = Some(String::new());
            }
        });
        return;
    };

    ui.strong(&system_name);
    ui.horizontal(|ui| {
        if ui.small_button("+ ☀").on_hover_text(t("menu.add_star")).clicked() {
            if let Err(e) = state.system.add_companion_star() {
                state.notifications.error(e.to_string());
            }
        }
        if ui.small_button("+ ◌").on_hover_text(t("menu.add_belt")).clicked() {
            if let Err(e) = state.system.add_asteroid_belt() {
                state.notifications.error(e.to_string());
            }
        }
    });
    ui.add_space(4.0);

    let mut action = None;
    let tree: &AppState = state;
    egui::ScrollArea::vertical()
        .id_salt("hierarchy_scroll")
        .show(ui, |ui| {
            for root in tree.system.roots() {
                body_row(ui, tree, root, &mut action);
            }
        });

    match action {
        Some(TreeAction::Select(id)) => {
            state.select_id(Some(&id));
        }
        Some(TreeAction::Focus(id)) => {
            state.select_id(Some(&id));
            state.focus_id(Some(&id));
        }
        Some(TreeAction::Add(parent, add)) => {
            if let Err(e) = perform_add(state, &parent, add) {
                state.notifications.error(e.to_string());
            }
        }
        Some(TreeAction::Delete(id)) => {
            if let Err(e) = state.remove_body(&id) {
                state.notifications.error(e.to_string());
            }
        }
        None => {}
    }
}

fn body_row(ui: &mut Ui, state: &AppState, body: &CelestialBody, action: &mut Option<TreeAction>) {
    let selected = state.view.is_selected(&body.id);
    let label_color = if selected {
        egui::Color32::from_rgb(120, 180, 255)
    } else {
        egui::Color32::from_rgb(205, 208, 220)
    };
    let label = egui::RichText::new(format!("{} {}", body_icon(body), body_display_name(body)))
        .color(label_color);

    let response = if body.children.is_empty() {
        ui.horizontal(|ui| {
            ui.add_space(18.0);
            ui.selectable_label(selected, label)
        })
        .inner
    } else {
        let id = ui.make_persistent_id(("body", &body.id));
        let (_, header, _) =
            egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), id, true)
                .show_header(ui, |ui| ui.selectable_label(selected, label))
                .body(|ui| {
                    for child in &body.children {
                        body_row(ui, state, child, action);
                    }
                });
        header.inner
    };

    let response = response.on_hover_text(body_sublabel(body));
    if response.clicked() {
        *action = Some(TreeAction::Select(body.id.clone()));
    }
    if response.double_clicked() {
        *action = Some(TreeAction::Focus(body.id.clone()));
    }

    response.context_menu(|ui| {
        let adds = add_actions_for(body.body_type());
        let has_adds = !adds.is_empty();
        for add in adds {
            let text = match add {
                AddAction::Planet => t("tree.add_planet").to_string(),
                AddAction::Moon => t("tree.add_moon").to_string(),
                AddAction::Station(kind) => format!("{}: {}", t("tree.add_station"), kind.label()),
            };
            if ui.button(text).clicked() {
                *action = Some(TreeAction::Add(body.id.clone(), add));
                ui.close_menu();
            }
        }
        if has_adds {
            ui.separator();
        }
        if ui.button(t("tree.focus")).clicked() {
            *action = Some(TreeAction::Focus(body.id.clone()));
            ui.close_menu();
        }
        let deletable = can_delete(state, body);
        let delete = ui
            .add_enabled(
                deletable,
                egui::Button::new(
                    egui::RichText::new(t("tree.delete")).color(egui::Color32::from_rgb(220, 80, 80)),
                ),
            )
            .on_disabled_hover_text(t("tree.last_star"));
        if delete.clicked() {
            *action = Some(TreeAction::Delete(body.id.clone()));
            ui.close_menu();
        }
    });
}
