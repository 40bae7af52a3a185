//! 2D camera math: auto-fit, world/screen mapping, zoom-at-pointer, focus.
//!
//! World units are orbit-distance units centered on the system origin. Screen
//! coordinates are egui points.

use glam::DVec2;
use shared::CelestialBody;

use crate::state::system::SystemStore;

/// Guard against cycles in malformed parent chains
const MAX_DEPTH: usize = 64;

/// Sum of orbit distances along the deepest root-to-descendant chain
pub fn max_extent(roots: &[CelestialBody]) -> f64 {
    fn extent(body: &CelestialBody) -> f64 {
        let deepest_child = body
            .children
            .iter()
            .map(extent)
            .fold(0.0_f64, f64::max);
        body.orbit_distance.max(0.0) + deepest_child
    }
    roots.iter().map(extent).fold(0.0_f64, f64::max)
}

/// Largest zoom <= 1 that fits `2 * extent` into the smaller viewport side
/// minus padding on both sides. Zero extent fits at zoom 1.
pub fn auto_fit_zoom(extent: f64, viewport: DVec2, padding: f64) -> f64 {
    if !(extent > 0.0) {
        return 1.0;
    }
    let available = viewport.x.min(viewport.y) - padding * 2.0;
    let required = extent * 2.0;
    (available / required).clamp(0.001, 1.0)
}

/// `max_extent` memoized on the tree version
#[derive(Debug, Default)]
pub struct ExtentCache {
    version: Option<u64>,
    extent: f64,
}

impl ExtentCache {
    pub fn get(&mut self, store: &SystemStore) -> f64 {
        if self.version != Some(store.version()) {
            self.extent = max_extent(store.roots());
            self.version = Some(store.version());
        }
        self.extent
    }
}

/// Offset of a body from its parent for a given angle in degrees
pub fn orbit_offset(angle_deg: f64, distance: f64) -> DVec2 {
    let rad = angle_deg.to_radians();
    DVec2::new(rad.cos(), rad.sin()) * distance
}

/// Absolute world position of a body, composed bottom-up through its parent
/// chain. `None` when the body is missing or the chain does not reach a root.
pub fn world_position(
    store: &SystemStore,
    id: &str,
    angle_of: impl Fn(&CelestialBody) -> f64,
) -> Option<DVec2> {
    let mut position = DVec2::ZERO;
    let mut current = store.find_body(id)?;
    for _ in 0..MAX_DEPTH {
        position += orbit_offset(angle_of(current), current.orbit_distance);
        match current.parent_id.as_deref() {
            None => return Some(position),
            Some(parent_id) => current = store.find_body(parent_id)?,
        }
    }
    None
}

/// Screen-space view: where the world origin lands and how large one world
/// unit is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Screen position of the world origin (viewport center + pan)
    pub origin: DVec2,
    /// Effective zoom (auto-fit * user zoom)
    pub zoom: f64,
}

impl Camera2D {
    pub fn new(viewport_center: DVec2, pan: DVec2, zoom: f64) -> Self {
        Self {
            origin: viewport_center + pan,
            zoom,
        }
    }

    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        self.origin + world * self.zoom
    }

    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        (screen - self.origin) / self.zoom
    }
}

/// New pan that keeps the world point under `pointer` fixed while the
/// effective zoom changes from `old_zoom` to `new_zoom`.
///
/// `pointer` is relative to the viewport center.
pub fn zoom_at_pointer(pan: DVec2, pointer: DVec2, old_zoom: f64, new_zoom: f64) -> DVec2 {
    if !(old_zoom > 0.0) {
        return pan;
    }
    pointer - (pointer - pan) * (new_zoom / old_zoom)
}

/// Pan that centers a world position in the viewport
pub fn focus_pan(target: DVec2, zoom: f64) -> DVec2 {
    -target * zoom
}
