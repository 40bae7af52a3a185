//! Main application module

mod dialogs;
mod keyboard;
mod menus;
mod styles;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use shared::SystemFile;

use crate::i18n::{set_lang, t, Lang};
use crate::persistence::remote::RemoteRepository;
use crate::persistence::SystemRepository;
use crate::sprites::{SpriteOrigin, SpriteResolver};
use crate::state::system::{Revision, SystemStore};
use crate::state::{AppState, LibraryDialog};
use crate::tasks::{PendingAction, TaskOutcome, TaskRunner};
use crate::ui::{hierarchy, properties, status_bar};
use crate::viewport::ViewportPanel;

/// Finished load held back until the user confirms dropping newer edits
struct ParkedLoad {
    file: SystemFile,
    sprites: Option<HashMap<String, SpriteOrigin>>,
    source: String,
}

/// Main application
pub struct StarforgeApp {
    state: AppState,
    viewport: ViewportPanel,
    tasks: TaskRunner,
    sprites: SpriteResolver,
    /// REST library in local mode
    repo: Option<Arc<dyn SystemRepository>>,
    /// Sprites from the sprite folder or the server; survives system changes
    base_sprites: HashMap<String, SpriteOrigin>,
    /// Target of plain "Save"
    save_path: Option<PathBuf>,
    property_buffers: properties::FieldBuffers,
    started: Instant,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
    /// Last autosaved system version
    last_saved_version: u64,
    /// System generation the sprite mapping belongs to
    sprite_generation: u64,
    parked_load: Option<ParkedLoad>,
}

impl StarforgeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial: Option<SystemFile>) -> Self {
        let mut state = AppState::default();
        set_lang(Lang::from_code(&state.settings.ui.language));

        // CLI argument first, then the autosave, then the Sol template
        let restored = initial.or_else(|| {
            state
                .settings
                .ui
                .restore_autosave
                .then(SystemStore::load_autosave)
                .flatten()
        });
        let start_file = restored.unwrap_or_else(crate::fixtures::sol_system);
        if let Err(e) = state.load_file(start_file) {
            tracing::error!("Startup system rejected: {e}");
            state.notifications.error(format!("{}: {e}", t("note.invalid")));
        }

        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut sprites = SpriteResolver::new();
        sprites.attach(&cc.egui_ctx);

        let last_font_size = state.settings.ui.font_size;
        let last_saved_version = state.system.version();
        let sprite_generation = state.system.generation();

        let mut app = Self {
            state,
            viewport: ViewportPanel::new(),
            tasks: TaskRunner::new(),
            sprites,
            repo: None,
            base_sprites: HashMap::new(),
            save_path: None,
            property_buffers: properties::FieldBuffers::default(),
            started: Instant::now(),
            last_font_size,
            last_saved_version,
            sprite_generation,
            parked_load: None,
        };
        app.connect_storage();
        app
    }

    // ── Storage ───────────────────────────────────────────────

    /// Set up the REST client (local mode) and request the sprite list
    fn connect_storage(&mut self) {
        let storage = self.state.settings.storage.clone();
        self.repo = None;
        if storage.local_mode {
            match RemoteRepository::new(&storage.api_url) {
                Ok(repo) => {
                    tracing::info!("Local mode: using {}", storage.api_url);
                    self.repo = Some(Arc::new(repo));
                }
                Err(e) => self.state.notifications.error(e.to_string()),
            }
        }
        self.reload_sprites();
    }

    fn reload_sprites(&mut self) {
        if let Some(repo) = &self.repo {
            let api_url = self.state.settings.storage.api_url.clone();
            self.tasks.fetch_remote_sprites(repo.clone(), api_url);
        } else if let Some(dir) = self.state.settings.storage.sprite_dir.clone() {
            self.tasks.scan_sprite_dir(dir);
        }
    }

    /// Start the mapping of a new system from the shared sprites plus the
    /// ones imported with it
    fn reset_sprites(&mut self, imported: Option<HashMap<String, SpriteOrigin>>) {
        self.sprite_generation = self.state.system.generation();
        let mut sources = self.base_sprites.clone();
        sources.extend(imported.unwrap_or_default());
        self.sprites.set_sources(sources);
    }

    // ── Actions ───────────────────────────────────────────────

    /// Run a destructive action, asking first when there are unsaved changes
    fn request(&mut self, action: PendingAction) {
        if let Some(action) = self.state.gate(action) {
            self.run_action(action);
        }
    }

    fn run_action(&mut self, action: PendingAction) {
        tracing::info!("Running: {}", action.describe());
        match action {
            PendingAction::NewSystem(name) => {
                self.state.new_system(&name);
                self.save_path = None;
                self.reset_sprites(None);
            }
            PendingAction::LoadTemplate => {
                if let Err(e) = self.state.load_file(crate::fixtures::sol_system()) {
                    self.state.notifications.error(e.to_string());
                }
                self.save_path = None;
                self.reset_sprites(None);
            }
            PendingAction::OpenFile(path) => {
                self.tasks.open_path(path, self.state.system.revision())
            }
            PendingAction::OpenLibrary(filename) => {
                if let Some(repo) = &self.repo {
                    let revision = self.state.system.revision();
                    self.tasks.load_from_library(repo.clone(), filename, revision);
                }
            }
            PendingAction::ApplyLoaded => {
                if let Some(parked) = self.parked_load.take() {
                    self.apply_loaded(parked);
                }
            }
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title(t("menu.open_title"))
            .add_filter("System", &["json", "zip"])
            .pick_file()
        {
            self.request(PendingAction::OpenFile(path));
        }
    }

    fn save(&mut self) {
        match self.save_path.clone() {
            Some(path) => {
                if let Some((file, revision)) = self.current_file() {
                    self.tasks.save_json(path, file, revision);
                }
            }
            None => self.save_as(),
        }
    }

    fn save_as(&mut self) {
        let Some((file, revision)) = self.current_file() else {
            return;
        };
        let name = crate::persistence::json::suggested_filename(&file, "json");
        if let Some(path) = rfd::FileDialog::new()
            .set_title(t("menu.save_title"))
            .add_filter("JSON", &["json"])
            .set_file_name(name)
            .save_file()
        {
            self.save_path = Some(path.clone());
            self.tasks.save_json(path, file, revision);
        }
    }

    fn save_bundle(&mut self) {
        let Some((file, revision)) = self.current_file() else {
            return;
        };
        let name = crate::persistence::json::suggested_filename(&file, "zip");
        if let Some(path) = rfd::FileDialog::new()
            .set_title(t("menu.bundle_title"))
            .add_filter("ZIP", &["zip"])
            .set_file_name(name)
            .save_file()
        {
            let sources = self.sprites.sources().clone();
            self.tasks.save_bundle(path, file, revision, sources);
        }
    }

    fn open_library(&mut self) {
        let Some(repo) = self.repo.clone() else {
            self.state.notifications.error(t("dlg.no_server"));
            return;
        };
        self.state.dialogs.library = Some(LibraryDialog {
            entries: Vec::new(),
            loading: true,
        });
        self.tasks.list_library(repo);
    }

    fn save_to_library(&mut self) {
        let (Some(repo), Some((file, revision))) = (self.repo.clone(), self.current_file())
        else {
            return;
        };
        self.tasks.save_to_library(repo, file, revision);
    }

    /// Snapshot to save, with the revision it was taken at
    fn current_file(&self) -> Option<(SystemFile, Revision)> {
        let file = self.state.system.to_file()?;
        Some((file, self.state.system.revision()))
    }

    fn apply_loaded(&mut self, loaded: ParkedLoad) {
        let ParkedLoad {
            file,
            sprites,
            source,
        } = loaded;
        match self.state.load_file(file) {
            Ok(()) => {
                self.save_path = PathBuf::from(&source)
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"))
                    .then(|| PathBuf::from(&source))
                    .filter(|p| p.is_absolute());
                self.reset_sprites(sprites);
                self.state
                    .notifications
                    .info(format!("{}: {source}", t("note.loaded")));
            }
            Err(e) => self
                .state
                .notifications
                .error(format!("{}: {e}", t("note.invalid"))),
        }
    }

    // ── Background results ────────────────────────────────────

    fn handle_outcomes(&mut self) {
        for outcome in self.tasks.poll() {
            match outcome {
                TaskOutcome::Loaded {
                    file,
                    sprites,
                    source,
                    requested_at,
                } => {
                    let loaded = ParkedLoad {
                        file,
                        sprites,
                        source,
                    };
                    if self.state.system.edited_since(requested_at) {
                        // edited while the load was running: ask again
                        self.parked_load = Some(loaded);
                        self.request(PendingAction::ApplyLoaded);
                    } else {
                        self.apply_loaded(loaded);
                    }
                }
                TaskOutcome::Saved { target, revision } => {
                    self.state.system.mark_clean_at(revision);
                    self.state
                        .notifications
                        .info(format!("{}: {target}", t("note.saved")));
                }
                TaskOutcome::Library(entries) => {
                    if let Some(dialog) = self.state.dialogs.library.as_mut() {
                        dialog.entries = entries;
                        dialog.loading = false;
                    }
                }
                TaskOutcome::Sprites(found) => {
                    tracing::info!("{} sprites available", found.len());
                    self.base_sprites = found.clone();
                    self.sprites.merge_sources(found);
                }
                TaskOutcome::Failed { action, error } => {
                    if let Some(dialog) = self.state.dialogs.library.as_mut() {
                        dialog.loading = false;
                    }
                    self.state
                        .notifications
                        .error(format!("{action}: {} ({error})", t("note.failed")));
                }
            }
        }
    }

    fn autosave_if_changed(&mut self) {
        let current_version = self.state.system.version();
        if current_version != self.last_saved_version {
            self.state.system.autosave();
            self.last_saved_version = current_version;
        }
    }
}

impl eframe::App for StarforgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        self.handle_outcomes();
        self.sprites.poll(ctx);

        if self.sprite_generation != self.state.system.generation() {
            self.reset_sprites(None);
        }

        keyboard::handle_keyboard(ctx, self);

        // Animator runs before the frame is built
        let now = self.started.elapsed().as_secs_f64();
        self.state.tick(now);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, self);
                menus::edit_menu(ui, self);
                menus::view_menu(ui, self);
            });
        });

        // ── Windows ───────────────────────────────────────────
        menus::settings_window(ctx, self);
        dialogs::show(ctx, self);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, self.tasks.is_busy());
            });

        // ── Left panel: Hierarchy ────────────────────────────
        if self.state.panels.hierarchy {
            egui::SidePanel::left("hierarchy")
                .default_width(230.0)
                .width_range(160.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    hierarchy::show(ui, &mut self.state);
                });
        }

        // ── Right panel: Properties ──────────────────────────
        if self.state.panels.properties {
            let sprite_names = self.sprites.identifiers();
            egui::SidePanel::right("properties")
                .default_width(290.0)
                .width_range(220.0..=500.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("props_scroll")
                        .show(ui, |ui| {
                            properties::show(
                                ui,
                                &mut self.state,
                                &mut self.property_buffers,
                                &sprite_names,
                            );
                        });
                });
        }

        // ── Central panel: system viewport ───────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state, &mut self.sprites);
            });

        self.autosave_if_changed();

        if self.state.view.is_animating && !self.state.system.roots().is_empty() {
            ctx.request_repaint_after(Duration::from_secs_f64(self.state.animator.tick_interval()));
        } else if self.tasks.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.system.autosave();
        self.state.settings.save();
    }
}
