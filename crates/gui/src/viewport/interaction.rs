//! Pointer input mapped onto view state.
//!
//! Positions are viewport-local screen coordinates, the same space the frame's
//! hit regions live in.

use glam::DVec2;

use super::camera::zoom_at_pointer;
use super::frame::RenderFrame;
use super::picking::pick;
use crate::state::view::{clamp_zoom, ViewState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Click { pos: DVec2 },
    DoubleClick { pos: DVec2 },
    /// Positive notches zoom in
    Wheel { pos: DVec2, notches: f64 },
    /// Total drag offset at release
    DragEnd { offset: DVec2 },
}

/// Apply one input event. `frame` is the frame the user was looking at.
pub fn apply_event(
    view: &mut ViewState,
    frame: &RenderFrame,
    viewport_center: DVec2,
    zoom_step: f64,
    event: ViewportEvent,
) {
    match event {
        ViewportEvent::Click { pos } => match pick(&frame.hits, pos) {
            Some(target) => view.select(Some(target.clone())),
            None => {
                view.select(None);
                view.set_focus_target(None);
            }
        },
        ViewportEvent::DoubleClick { pos } => match pick(&frame.hits, pos) {
            Some(target) => {
                view.select(Some(target.clone()));
                view.set_focus_target(Some(target.clone()));
            }
            None => {
                view.select(None);
                view.set_focus_target(None);
            }
        },
        ViewportEvent::Wheel { pos, notches } => {
            if notches == 0.0 || !notches.is_finite() {
                return;
            }
            let old_store = view.camera_zoom();
            let new_store = clamp_zoom(old_store * zoom_step.powf(notches));
            let old_zoom = frame.auto_fit * old_store;
            let new_zoom = frame.auto_fit * new_store;
            let pan = zoom_at_pointer(
                view.camera_position(),
                pos - viewport_center,
                old_zoom,
                new_zoom,
            );
            view.set_camera_zoom(new_store);
            view.set_camera_position(pan);
        }
        ViewportEvent::DragEnd { offset } => {
            view.set_camera_position(view.camera_position() + offset);
            view.set_focus_target(None);
        }
    }
}
