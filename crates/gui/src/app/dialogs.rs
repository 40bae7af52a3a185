//! Modal dialogs: new system, unsaved changes, library browser, notifications

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use super::StarforgeApp;
use crate::i18n::t;
use crate::state::NotificationLevel;
use crate::tasks::PendingAction;

pub fn show(ctx: &egui::Context, app: &mut StarforgeApp) {
    new_system_dialog(ctx, app);
    confirm_discard_dialog(ctx, app);
    library_dialog(ctx, app);
    notifications(ctx, app);
}

fn new_system_dialog(ctx: &egui::Context, app: &mut StarforgeApp) {
    let Some(name) = app.state.dialogs.new_system.as_mut() else {
        return;
    };
    let mut create = false;
    let mut cancel = false;

    egui::Window::new(t("dlg.new_title"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(t("dlg.star_name"));
                let response = ui.add(
                    egui::TextEdit::singleline(name)
                        .hint_text("Sol")
                        .desired_width(180.0),
                );
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    create = true;
                }
            });
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let valid = !name.trim().is_empty();
                if ui
                    .add_enabled(valid, egui::Button::new(t("dlg.create")))
                    .clicked()
                {
                    create = true;
                }
                if ui.button(t("dlg.cancel")).clicked() {
                    cancel = true;
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        cancel = true;
    }
    if create && !name.trim().is_empty() {
        let name = name.trim().to_string();
        app.state.dialogs.new_system = None;
        app.request(PendingAction::NewSystem(name));
    } else if cancel {
        app.state.dialogs.new_system = None;
    }
}

fn confirm_discard_dialog(ctx: &egui::Context, app: &mut StarforgeApp) {
    let Some(action) = app.state.dialogs.confirm_discard.as_ref() else {
        return;
    };
    let description = action.describe();
    let mut confirmed = false;
    let mut cancelled = false;

    egui::Window::new(t("dlg.unsaved_title"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(t("dlg.unsaved_text"));
            ui.weak(description);
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .button(
                        egui::RichText::new(t("dlg.discard"))
                            .color(egui::Color32::from_rgb(220, 80, 80)),
                    )
                    .clicked()
                {
                    confirmed = true;
                }
                if ui.button(t("dlg.cancel")).clicked() {
                    cancelled = true;
                }
            });
        });

    if confirmed {
        if let Some(action) = app.state.confirm_discard() {
            app.run_action(action);
        }
    } else if cancelled {
        app.state.cancel_discard();
    }
}

fn library_dialog(ctx: &egui::Context, app: &mut StarforgeApp) {
    let Some(dialog) = app.state.dialogs.library.as_ref() else {
        return;
    };
    let loading = dialog.loading;
    let entries = dialog.entries.clone();
    let mut open = true;
    let mut to_open = None;
    let mut to_delete = None;
    let mut refresh = false;

    egui::Window::new(t("dlg.library_title"))
        .open(&mut open)
        .collapsible(false)
        .default_width(420.0)
        .show(ctx, |ui| {
            if loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak(t("dlg.loading"));
                });
            } else if entries.is_empty() {
                ui.weak(t("dlg.library_empty"));
            }

            ui.push_id("library_table", |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .max_scroll_height(320.0)
                    .column(Column::remainder().at_least(120.0))
                    .column(Column::auto_with_initial_suggestion(140.0).resizable(true))
                    .column(Column::auto())
                    .header(18.0, |mut header| {
                        header.col(|ui| {
                            ui.strong(t("prop.name"));
                        });
                        header.col(|ui| {
                            ui.strong(t("dlg.file"));
                        });
                        header.col(|_| {});
                    })
                    .body(|mut body| {
                        for entry in &entries {
                            body.row(20.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(&entry.name);
                                });
                                row.col(|ui| {
                                    ui.weak(&entry.filename);
                                });
                                row.col(|ui| {
                                    if ui.small_button(t("dlg.open")).clicked() {
                                        to_open = Some(entry.filename.clone());
                                    }
                                    if ui
                                        .small_button(
                                            egui::RichText::new(t("dlg.delete"))
                                                .color(egui::Color32::from_rgb(220, 80, 80)),
                                        )
                                        .clicked()
                                    {
                                        to_delete = Some(entry.filename.clone());
                                    }
                                });
                            });
                        }
                    });
            });

            ui.separator();
            if ui
                .add_enabled(!loading, egui::Button::new(t("dlg.refresh")))
                .clicked()
            {
                refresh = true;
            }
        });

    if let Some(filename) = to_open {
        app.state.dialogs.library = None;
        app.request(PendingAction::OpenLibrary(filename));
        return;
    }
    if !open {
        app.state.dialogs.library = None;
        return;
    }
    let Some(repo) = app.repo.clone() else {
        return;
    };
    if let Some(filename) = to_delete {
        if let Some(dialog) = app.state.dialogs.library.as_mut() {
            dialog.loading = true;
        }
        app.tasks.delete_from_library(repo, filename);
    } else if refresh {
        if let Some(dialog) = app.state.dialogs.library.as_mut() {
            dialog.loading = true;
        }
        app.tasks.list_library(repo);
    }
}

/// Stack of dismissable messages in the bottom-right corner
fn notifications(ctx: &egui::Context, app: &mut StarforgeApp) {
    if app.state.notifications.items().is_empty() {
        return;
    }
    let mut dismiss = None;

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -34.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (i, note) in app.state.notifications.items().iter().enumerate() {
                let fill = match note.level {
                    NotificationLevel::Info => egui::Color32::from_rgb(32, 52, 80),
                    NotificationLevel::Error => egui::Color32::from_rgb(90, 30, 34),
                };
                egui::Frame::NONE
                    .fill(fill)
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.set_max_width(360.0);
                        ui.horizontal(|ui| {
                            ui.label(&note.message);
                            if ui.small_button("✕").clicked() {
                                dismiss = Some(i);
                            }
                        });
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(i) = dismiss {
        app.state.notifications.dismiss(i);
    }
}
