pub mod settings;
pub mod system;
pub mod view;

use shared::validation::ValidationError;
use shared::{BodyId, SystemFile};

use crate::animator::OrbitAnimator;
use crate::tasks::PendingAction;
pub use settings::AppSettings;
pub use system::{body_display_name, body_icon, BodyPatch, SystemStore, TreeError};
pub use view::{Selection, ViewState};

/// Panel visibility flags
pub struct PanelVisibility {
    pub hierarchy: bool,
    pub properties: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            hierarchy: true,
            properties: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Messages shown in the notification area until dismissed
#[derive(Debug, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message.into());
    }

    fn push(&mut self, level: NotificationLevel, message: String) {
        // keep the list short
        if self.items.len() >= 5 {
            self.items.remove(0);
        }
        self.items.push(Notification { level, message });
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Open dialogs and their input buffers
#[derive(Default)]
pub struct Dialogs {
    /// Name buffer of the "New system" dialog
    pub new_system: Option<String>,
    /// Action waiting for the unsaved-changes confirmation
    pub confirm_discard: Option<PendingAction>,
    /// Library browser (local mode)
    pub library: Option<LibraryDialog>,
    pub show_settings: bool,
}

#[derive(Default)]
pub struct LibraryDialog {
    pub entries: Vec<shared::SystemEntry>,
    pub loading: bool,
}

/// Combined application state
pub struct AppState {
    pub system: SystemStore,
    pub view: ViewState,
    pub animator: OrbitAnimator,
    pub settings: AppSettings,
    pub panels: PanelVisibility,
    pub notifications: Notifications,
    pub dialogs: Dialogs,
    /// System generation the view and animator were last synced to
    synced_generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AppSettings::load(), SystemStore::default())
    }
}

impl AppState {
    pub fn with_settings(settings: AppSettings, system: SystemStore) -> Self {
        let mut view = ViewState::default();
        view.is_animating = settings.animation.autoplay;
        Self {
            animator: OrbitAnimator::from_settings(&settings.animation),
            synced_generation: system.generation(),
            system,
            view,
            settings,
            panels: PanelVisibility::default(),
            notifications: Notifications::default(),
            dialogs: Dialogs::default(),
        }
    }

    /// Reset view and animation state after the system identity changed.
    /// Cheap when nothing changed; called every frame.
    pub fn sync_system_identity(&mut self) -> bool {
        let generation = self.system.generation();
        if generation == self.synced_generation {
            return false;
        }
        self.synced_generation = generation;
        self.view.on_system_changed();
        self.view.is_animating = self.settings.animation.autoplay;
        self.animator.sync_generation(generation);
        true
    }

    /// Advance the animator; runs before the frame is built
    pub fn tick(&mut self, now: f64) -> bool {
        self.sync_system_identity();
        self.animator
            .tick(now, self.system.roots(), self.view.is_animating)
    }

    /// Validate and load a document
    pub fn load_file(&mut self, file: SystemFile) -> Result<(), ValidationError> {
        self.system.load_file(file)?;
        self.sync_system_identity();
        Ok(())
    }

    pub fn new_system(&mut self, name: &str) {
        self.system.new_system(name);
        self.sync_system_identity();
    }

    /// Remove a body and everything under it, dropping view and animation
    /// references to the removed ids. The last star cannot be removed.
    pub fn remove_body(&mut self, id: &str) -> Result<Vec<BodyId>, TreeError> {
        let removed = self.system.remove_body_checked(id)?;
        self.view.forget(&removed);
        self.animator.forget(&removed);
        Ok(removed)
    }

    /// Select a body by id; unknown ids clear the selection
    pub fn select_id(&mut self, id: Option<&str>) -> bool {
        let selection = id.and_then(|id| self.system.find_body(id)).map(Selection::of);
        let found = selection.is_some();
        self.view.select(selection);
        found
    }

    /// Follow a body by id; unknown ids clear the focus target
    pub fn focus_id(&mut self, id: Option<&str>) -> bool {
        let target = id.and_then(|id| self.system.find_body(id)).map(Selection::of);
        let found = target.is_some();
        self.view.set_focus_target(target);
        found
    }

    /// Run `action` now when there are no unsaved changes, otherwise park it
    /// behind the confirmation dialog
    pub fn gate(&mut self, action: PendingAction) -> Option<PendingAction> {
        if self.system.is_dirty() {
            tracing::debug!("Unsaved changes, asking before: {}", action.describe());
            self.dialogs.confirm_discard = Some(action);
            None
        } else {
            Some(action)
        }
    }

    /// User confirmed discarding changes
    pub fn confirm_discard(&mut self) -> Option<PendingAction> {
        self.dialogs.confirm_discard.take()
    }

    pub fn cancel_discard(&mut self) {
        self.dialogs.confirm_discard = None;
    }
}
