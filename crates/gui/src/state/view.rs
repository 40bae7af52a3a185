//! Camera and selection state.
//!
//! Transient view state that is never persisted. The render engine is the only
//! writer of `computed_zoom`; everything else goes through the setters here.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use shared::{BodyId, BodyType, CelestialBody};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Reference to a body as seen by the view (selection or focus target)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(rename = "type")]
    pub kind: BodyType,
    pub id: BodyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BodyId>,
}

impl Selection {
    pub fn of(body: &CelestialBody) -> Self {
        Self {
            kind: body.body_type(),
            id: body.id.clone(),
            parent_id: body.parent_id.clone(),
        }
    }
}

/// Clamp a user zoom into the allowed range. Non-finite input resets to 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    selection: Option<Selection>,
    /// Pan offset in screen pixels
    camera_position: DVec2,
    /// User zoom factor in [MIN_ZOOM, MAX_ZOOM]
    camera_zoom: f64,
    /// Auto-fit zoom times user zoom, published by the renderer
    computed_zoom: f64,
    focus_target: Option<Selection>,
    pub show_orbits: bool,
    pub is_animating: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selection: None,
            camera_position: DVec2::ZERO,
            camera_zoom: 1.0,
            computed_zoom: 1.0,
            focus_target: None,
            show_orbits: true,
            is_animating: true,
        }
    }
}

impl ViewState {
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.id.as_str())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id() == Some(id)
    }

    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn camera_position(&self) -> DVec2 {
        self.camera_position
    }

    /// Set the pan offset. Callers that pan manually also clear the focus
    /// target.
    pub fn set_camera_position(&mut self, position: DVec2) {
        if position.is_finite() {
            self.camera_position = position;
        }
    }

    pub fn camera_zoom(&self) -> f64 {
        self.camera_zoom
    }

    /// Set the user zoom, clamped to [0.1, 5.0]
    pub fn set_camera_zoom(&mut self, zoom: f64) {
        self.camera_zoom = clamp_zoom(zoom);
    }

    pub fn computed_zoom(&self) -> f64 {
        self.computed_zoom
    }

    /// Written by the render engine once per frame
    pub fn publish_computed_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.computed_zoom = zoom;
        }
    }

    pub fn focus_target(&self) -> Option<&Selection> {
        self.focus_target.as_ref()
    }

    pub fn set_focus_target(&mut self, target: Option<Selection>) {
        self.focus_target = target;
    }

    /// Pan back to the origin at zoom 1. Focus and computed zoom are kept.
    pub fn reset_camera(&mut self) {
        self.camera_position = DVec2::ZERO;
        self.camera_zoom = 1.0;
    }

    pub fn toggle_orbits(&mut self) {
        self.show_orbits = !self.show_orbits;
    }

    pub fn toggle_animation(&mut self) {
        self.is_animating = !self.is_animating;
    }

    /// Drop selection/focus references to removed bodies
    pub fn forget(&mut self, removed: &[BodyId]) {
        let gone = |s: &Option<Selection>| {
            s.as_ref()
                .is_some_and(|s| removed.iter().any(|id| *id == s.id))
        };
        if gone(&self.selection) {
            self.selection = None;
        }
        if gone(&self.focus_target) {
            self.focus_target = None;
        }
    }

    /// Reset everything tied to the previous system
    pub fn on_system_changed(&mut self) {
        self.selection = None;
        self.focus_target = None;
        self.reset_camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sel(id: &str) -> Selection {
        Selection {
            kind: BodyType::Planet,
            id: id.to_string(),
            parent_id: Some("Sol".to_string()),
        }
    }

    #[test]
    fn test_defaults() {
        let v = ViewState::default();
        assert!(v.selection().is_none());
        assert_eq!(v.camera_position(), DVec2::ZERO);
        assert_eq!(v.camera_zoom(), 1.0);
        assert!(v.show_orbits);
        assert!(v.is_animating);
    }

    #[test]
    fn test_select_and_clear() {
        let mut v = ViewState::default();
        v.select(Some(sel("Sol 1")));
        assert!(v.is_selected("Sol 1"));
        v.select(None);
        assert!(v.selected_id().is_none());
    }

    #[test]
    fn test_zoom_clamped() {
        let mut v = ViewState::default();
        v.set_camera_zoom(10.0);
        assert_eq!(v.camera_zoom(), 5.0);
        v.set_camera_zoom(-3.0);
        assert_eq!(v.camera_zoom(), 0.1);
        v.set_camera_zoom(0.0);
        assert_eq!(v.camera_zoom(), 0.1);
        v.set_camera_zoom(f64::NAN);
        assert_eq!(v.camera_zoom(), 1.0);
        v.set_camera_zoom(f64::INFINITY);
        assert_eq!(v.camera_zoom(), 5.0);
    }

    #[test]
    fn test_reset_camera_keeps_focus_and_computed_zoom() {
        let mut v = ViewState::default();
        v.set_camera_position(DVec2::new(40.0, -12.0));
        v.set_camera_zoom(3.0);
        v.publish_computed_zoom(0.6);
        v.set_focus_target(Some(sel("Sol 3")));

        v.reset_camera();
        assert_eq!(v.camera_position(), DVec2::ZERO);
        assert_eq!(v.camera_zoom(), 1.0);
        assert_eq!(v.computed_zoom(), 0.6);
        assert_eq!(v.focus_target().map(|f| f.id.as_str()), Some("Sol 3"));
    }

    #[test]
    fn test_forget_removed_ids() {
        let mut v = ViewState::default();
        v.select(Some(sel("Sol 1 a")));
        v.set_focus_target(Some(sel("Sol 2")));
        v.forget(&["Sol 1".to_string(), "Sol 1 a".to_string()]);
        assert!(v.selection().is_none());
        assert!(v.focus_target().is_some());
    }

    #[test]
    fn test_toggles() {
        let mut v = ViewState::default();
        v.toggle_orbits();
        v.toggle_animation();
        assert!(!v.show_orbits);
        assert!(!v.is_animating);
    }

    #[test]
    fn test_selection_serde_uses_type_key() {
        let json = serde_json::to_value(sel("Sol 1")).unwrap();
        assert_eq!(json["type"], "planet");
        assert_eq!(json["parentId"], "Sol");
    }

    proptest! {
        #[test]
        fn zoom_always_clamped(z in proptest::num::f64::ANY) {
            let mut v = ViewState::default();
            v.set_camera_zoom(z);
            let stored = v.camera_zoom();
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&stored));
            if z.is_finite() || z.is_infinite() {
                prop_assert_eq!(stored, z.clamp(MIN_ZOOM, MAX_ZOOM));
            }
        }
    }
}
