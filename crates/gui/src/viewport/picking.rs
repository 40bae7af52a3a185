//! Hit testing against the regions produced by the last frame

use glam::DVec2;

use super::frame::{HitRegion, HitShape};
use crate::state::view::Selection;

/// Topmost body under `point`.
///
/// Discs win over belt bands so that a planet sitting on a belt stays
/// clickable; within each group the last drawn region wins.
pub fn pick(hits: &[HitRegion], point: DVec2) -> Option<&Selection> {
    let topmost = |want_circle: bool| {
        hits.iter()
            .rev()
            .filter(|h| matches!(h.shape, HitShape::Circle { .. }) == want_circle)
            .find(|h| h.shape.contains(point))
            .map(|h| &h.target)
    };
    topmost(true).or_else(|| topmost(false))
}
