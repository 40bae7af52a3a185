//! Application menu bar and settings window

use eframe::egui;

use super::StarforgeApp;
use crate::i18n::{lang, set_lang, t, Lang};
use crate::tasks::PendingAction;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    let has_system = app.state.system.has_system();
    let local = app.repo.is_some();

    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.new")).clicked() {
            app.state.dialogs.new_system = Some(String::new());
            ui.close_menu();
        }
        if ui.button(t("menu.load_sol")).clicked() {
            app.request(PendingAction::LoadTemplate);
            ui.close_menu();
        }
        if ui.button(t("menu.open")).clicked() {
            ui.close_menu();
            app.open_file_dialog();
        }
        if ui
            .add_enabled(local, egui::Button::new(t("menu.library")))
            .clicked()
        {
            ui.close_menu();
            app.open_library();
        }
        ui.separator();
        if ui
            .add_enabled(has_system, egui::Button::new(t("menu.save")))
            .clicked()
        {
            ui.close_menu();
            app.save();
        }
        if ui
            .add_enabled(has_system, egui::Button::new(t("menu.save_as")))
            .clicked()
        {
            ui.close_menu();
            app.save_as();
        }
        if ui
            .add_enabled(has_system, egui::Button::new(t("menu.save_bundle")))
            .clicked()
        {
            ui.close_menu();
            app.save_bundle();
        }
        if ui
            .add_enabled(has_system && local, egui::Button::new(t("menu.save_library")))
            .clicked()
        {
            ui.close_menu();
            app.save_to_library();
        }
        ui.separator();
        if ui
            .add_enabled(!local, egui::Button::new(t("menu.sprite_dir")))
            .clicked()
        {
            ui.close_menu();
            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                app.state.settings.storage.sprite_dir = Some(dir);
                app.state.settings.save();
                app.reload_sprites();
            }
        }
        if ui.button(t("menu.reload_sprites")).clicked() {
            ui.close_menu();
            app.reload_sprites();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    let has_system = app.state.system.has_system();
    let selected = crate::helpers::selected_body(&app.state)
        .map(|body| (body.id.clone(), crate::helpers::can_delete(&app.state, body)));

    ui.menu_button(t("menu.edit"), |ui| {
        if ui
            .add_enabled(has_system, egui::Button::new(t("menu.add_star")))
            .clicked()
        {
            match app.state.system.add_companion_star() {
                Ok(id) => {
                    app.state.select_id(Some(&id));
                }
                Err(e) => app.state.notifications.error(e.to_string()),
            }
            ui.close_menu();
        }
        if ui
            .add_enabled(has_system, egui::Button::new(t("menu.add_belt")))
            .clicked()
        {
            match app.state.system.add_asteroid_belt() {
                Ok(id) => {
                    app.state.select_id(Some(&id));
                }
                Err(e) => app.state.notifications.error(e.to_string()),
            }
            ui.close_menu();
        }
        ui.separator();
        let deletable = selected.as_ref().is_some_and(|(_, ok)| *ok);
        if ui
            .add_enabled(deletable, egui::Button::new(t("menu.delete")))
            .clicked()
        {
            if let Some((id, _)) = &selected {
                if let Err(e) = app.state.remove_body(id) {
                    app.state.notifications.error(e.to_string());
                }
            }
            ui.close_menu();
        }
        if ui
            .add_enabled(selected.is_some(), egui::Button::new(t("menu.deselect")))
            .clicked()
        {
            app.state.view.select(None);
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut app.state.panels.hierarchy, t("menu.hierarchy"));
        ui.checkbox(&mut app.state.panels.properties, t("menu.properties"));
        ui.separator();
        ui.checkbox(&mut app.state.view.show_orbits, t("menu.show_orbits"));
        let mut animating = app.state.view.is_animating;
        if ui.checkbox(&mut animating, t("menu.animate")).changed() {
            app.state.view.toggle_animation();
        }
        let selected = app.state.view.selected_id().map(str::to_owned);
        if ui
            .add_enabled(selected.is_some(), egui::Button::new(t("menu.focus")))
            .clicked()
        {
            app.state.focus_id(selected.as_deref());
            ui.close_menu();
        }
        if ui.button(t("menu.reset_camera")).clicked() {
            app.state.view.reset_camera();
            app.state.view.set_focus_target(None);
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, label) in [(Lang::En, "English"), (Lang::Ru, "Русский")] {
                if ui.selectable_label(lang() == l, label).clicked() {
                    set_lang(l);
                    app.state.settings.ui.language = l.code().to_string();
                    app.state.settings.save();
                    ui.close_menu();
                }
            }
        });
        if ui.button(t("menu.settings")).clicked() {
            app.state.dialogs.show_settings = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, app: &mut StarforgeApp) {
    let mut open = app.state.dialogs.show_settings;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(380.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_animation_settings(ui, app);
                show_viewport_settings(ui, app);
                show_storage_settings(ui, app);
                show_ui_settings(ui, app);
                show_settings_buttons(ui, app);
            });
        });
    app.state.dialogs.show_settings &= open;
}

fn show_animation_settings(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    let animation = &mut app.state.settings.animation;
    ui.heading(t("settings.animation"));
    ui.horizontal(|ui| {
        ui.label(t("settings.tick_hz"));
        ui.add(
            egui::DragValue::new(&mut animation.tick_hz)
                .speed(1.0)
                .range(1.0..=120.0),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.speed"));
        if ui
            .add(
                egui::DragValue::new(&mut animation.speed_multiplier)
                    .speed(0.5)
                    .range(0.0..=100.0),
            )
            .changed()
        {
            app.state.animator.set_speed_multiplier(animation.speed_multiplier);
        }
    });
    ui.checkbox(&mut animation.autoplay, t("settings.autoplay"));
    ui.add_space(10.0);
}

fn show_viewport_settings(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    let viewport = &mut app.state.settings.viewport;
    ui.heading(t("settings.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bg_color"));
        let [r, g, b] = viewport.background_color;
        let mut color = egui::Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            viewport.background_color = [color.r(), color.g(), color.b()];
        }
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.sel_color"));
        let [r, g, b] = viewport.selection_color;
        let mut color = egui::Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            viewport.selection_color = [color.r(), color.g(), color.b()];
        }
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.fit_padding"));
        ui.add(
            egui::DragValue::new(&mut viewport.fit_padding)
                .speed(1.0)
                .range(0.0..=300.0),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.wheel_step"));
        ui.add(
            egui::DragValue::new(&mut viewport.wheel_zoom_step)
                .speed(0.005)
                .range(1.001..=1.5),
        );
    });
    ui.add_space(10.0);
}

fn show_storage_settings(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    ui.heading(t("settings.storage"));
    let storage = &mut app.state.settings.storage;
    let mut changed = ui
        .checkbox(&mut storage.local_mode, t("settings.local_mode"))
        .changed();
    ui.horizontal(|ui| {
        ui.label(t("settings.api_url"));
        changed |= ui
            .add_enabled(
                storage.local_mode,
                egui::TextEdit::singleline(&mut storage.api_url).desired_width(200.0),
            )
            .lost_focus();
    });
    if changed {
        app.connect_storage();
    }
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    let settings = &mut app.state.settings.ui;
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut settings.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.checkbox(&mut settings.restore_autosave, t("settings.restore"));
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, app: &mut StarforgeApp) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            app.state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            app.state.settings = crate::state::AppSettings::default();
            app.state
                .animator
                .set_speed_multiplier(app.state.settings.animation.speed_multiplier);
            set_lang(Lang::from_code(&app.state.settings.ui.language));
        }
        if ui.button(t("settings.close")).clicked() {
            app.state.dialogs.show_settings = false;
        }
    });
}
