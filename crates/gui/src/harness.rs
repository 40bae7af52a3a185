//! Headless test harness for programmatic system manipulation.
//!
//! Drives the same stores, animator and render engine as the window, with a
//! fixed viewport and a manual clock. Used by the JSON command protocol and
//! the integration tests.

use glam::DVec2;
use shared::{BodyId, StationType, SystemFile};

use crate::fixtures;
use crate::persistence::json;
use crate::state::settings::AppSettings;
use crate::state::{AppState, BodyPatch, SystemStore, TreeError};
use crate::viewport::frame::{FrameParams, NoSprites, RenderEngine, RenderFrame};
use crate::viewport::interaction::{apply_event, ViewportEvent};

/// Default headless viewport size
pub const VIEWPORT: DVec2 = DVec2::new(800.0, 600.0);

/// Headless harness: application state, render engine and a manual clock
pub struct TestHarness {
    pub state: AppState,
    pub engine: RenderEngine,
    pub viewport: DVec2,
    last_frame: Option<RenderFrame>,
    /// Seconds on the manual clock
    clock: f64,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Empty harness with default settings and a seeded store
    pub fn new() -> Self {
        Self::with_settings(AppSettings::default())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            state: AppState::with_settings(settings, SystemStore::with_seed(42)),
            engine: RenderEngine::new(),
            viewport: VIEWPORT,
            last_frame: None,
            clock: 0.0,
        }
    }

    // ── System lifecycle ──────────────────────────────────────

    pub fn new_system(&mut self, name: &str) {
        self.state.new_system(name);
        self.last_frame = None;
    }

    /// Load a document (replaces current)
    pub fn load_file(&mut self, file: SystemFile) -> Result<(), String> {
        self.state.load_file(file).map_err(|e| e.to_string())?;
        self.last_frame = None;
        Ok(())
    }

    /// Load a document from a JSON string
    pub fn load_json(&mut self, text: &str) -> Result<(), String> {
        let file = json::from_json_str(text).map_err(|e| e.to_string())?;
        self.load_file(file)
    }

    pub fn load_sol(&mut self) {
        // the template always validates
        if let Err(e) = self.load_file(fixtures::sol_system()) {
            tracing::error!("Sol template rejected: {}", e);
        }
    }

    /// Export the current system as pretty JSON, `None` without a system
    pub fn export_json(&self) -> Option<String> {
        let file = self.state.system.to_file()?;
        json::to_json_string(&file).ok()
    }

    // ── Tree manipulation ─────────────────────────────────────

    pub fn add_planet(&mut self, star_id: &str) -> Result<BodyId, TreeError> {
        self.state.system.add_planet(star_id)
    }

    pub fn add_moon(&mut self, planet_id: &str) -> Result<BodyId, TreeError> {
        self.state.system.add_moon(planet_id)
    }

    pub fn add_station(
        &mut self,
        parent_id: &str,
        station_type: StationType,
    ) -> Result<BodyId, TreeError> {
        self.state.system.add_station(parent_id, station_type)
    }

    pub fn add_belt(&mut self) -> Result<BodyId, TreeError> {
        self.state.system.add_asteroid_belt()
    }

    pub fn add_star(&mut self) -> Result<BodyId, TreeError> {
        self.state.system.add_companion_star()
    }

    pub fn update(&mut self, id: &str, patch: BodyPatch) -> Result<(), TreeError> {
        self.state.system.update_body(id, patch)
    }

    /// Remove a body and its subtree; returns the removed ids
    pub fn remove(&mut self, id: &str) -> Result<Vec<BodyId>, TreeError> {
        self.state.remove_body(id)
    }

    pub fn body_count(&self) -> usize {
        self.state.system.body_count()
    }

    // ── View ──────────────────────────────────────────────────

    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.state.select_id(id)
    }

    pub fn focus(&mut self, id: Option<&str>) -> bool {
        self.state.focus_id(id)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.state.view.set_camera_zoom(zoom);
    }

    pub fn set_animating(&mut self, on: bool) {
        self.state.view.is_animating = on;
    }

    // ── Time ──────────────────────────────────────────────────

    /// Move the manual clock forward and run the animator on it
    pub fn tick(&mut self, seconds: f64) -> bool {
        self.clock += seconds.max(0.0);
        self.state.tick(self.clock)
    }

    /// Advance every orbit by exactly `seconds`, bypassing the tick rate
    pub fn advance(&mut self, seconds: f64) {
        self.state.sync_system_identity();
        let roots = self.state.system.roots();
        self.state.animator.advance(roots, seconds);
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    // ── Rendering and input ───────────────────────────────────

    /// Build a frame for the current state and keep it for input events
    pub fn render(&mut self) -> &RenderFrame {
        self.state.sync_system_identity();
        let params = FrameParams::new(self.viewport, &self.state.settings.viewport);
        let frame = self.engine.frame(
            &self.state.system,
            &mut self.state.view,
            &self.state.animator,
            &mut NoSprites,
            &params,
        );
        self.last_frame.insert(frame)
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    fn dispatch(&mut self, event: ViewportEvent) {
        if self.last_frame.is_none() {
            self.render();
        }
        let Some(frame) = self.last_frame.as_ref() else {
            return;
        };
        let step = self.state.settings.viewport.wheel_zoom_step;
        apply_event(
            &mut self.state.view,
            frame,
            self.viewport * 0.5,
            step,
            event,
        );
    }

    pub fn click(&mut self, pos: DVec2) {
        self.dispatch(ViewportEvent::Click { pos });
    }

    pub fn double_click(&mut self, pos: DVec2) {
        self.dispatch(ViewportEvent::DoubleClick { pos });
    }

    pub fn wheel(&mut self, pos: DVec2, notches: f64) {
        self.dispatch(ViewportEvent::Wheel { pos, notches });
    }

    pub fn drag(&mut self, offset: DVec2) {
        self.dispatch(ViewportEvent::DragEnd { offset });
    }

    /// Screen position of a body in the last rendered frame
    pub fn screen_position(&self, id: &str) -> Option<DVec2> {
        self.last_frame.as_ref()?.body_center(id)
    }
}
