//! Keyboard shortcut handling

use eframe::egui;

use super::StarforgeApp;

#[derive(Default)]
struct Shortcuts {
    new: bool,
    open: bool,
    save: bool,
    escape: bool,
    delete: bool,
    toggle_animation: bool,
    toggle_orbits: bool,
    focus: bool,
    reset_camera: bool,
}

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, app: &mut StarforgeApp) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }
    // Dialogs own the keyboard while open
    if app.state.dialogs.new_system.is_some() || app.state.dialogs.confirm_discard.is_some() {
        return;
    }

    let keys = ctx.input(|i| Shortcuts {
        new: i.modifiers.command && i.key_pressed(egui::Key::N),
        open: i.modifiers.command && i.key_pressed(egui::Key::O),
        save: i.modifiers.command && i.key_pressed(egui::Key::S),
        escape: i.key_pressed(egui::Key::Escape),
        delete: i.key_pressed(egui::Key::Delete),
        toggle_animation: i.key_pressed(egui::Key::Space),
        toggle_orbits: !i.modifiers.command && i.key_pressed(egui::Key::O),
        focus: !i.modifiers.command && i.key_pressed(egui::Key::F),
        reset_camera: i.key_pressed(egui::Key::Home),
    });

    if keys.new {
        app.state.dialogs.new_system = Some(String::new());
    }
    if keys.open {
        app.open_file_dialog();
    }
    if keys.save && app.state.system.has_system() {
        app.save();
    }
    // Escape clears selection and stops following
    if keys.escape {
        app.state.view.select(None);
        app.state.view.set_focus_target(None);
    }
    if keys.delete {
        handle_delete(app);
    }
    if keys.toggle_animation {
        app.state.view.toggle_animation();
    }
    if keys.toggle_orbits {
        app.state.view.toggle_orbits();
    }
    if keys.focus {
        let selected = app.state.view.selected_id().map(str::to_owned);
        app.state.focus_id(selected.as_deref());
    }
    if keys.reset_camera {
        app.state.view.reset_camera();
        app.state.view.set_focus_target(None);
    }
}

fn handle_delete(app: &mut StarforgeApp) {
    let Some(body) = crate::helpers::selected_body(&app.state) else {
        return;
    };
    if !crate::helpers::can_delete(&app.state, body) {
        app.state
            .notifications
            .error(crate::i18n::t("tree.last_star"));
        return;
    }
    let id = body.id.clone();
    if let Err(e) = app.state.remove_body(&id) {
        app.state.notifications.error(e.to_string());
    }
}
