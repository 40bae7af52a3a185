//! Orbit animation.
//!
//! Keeps a side cache of body id -> current orbit angle (degrees) so that the
//! canonical tree is never mutated by animation. The cache advances on a fixed
//! tick, independent of how often the UI repaints.

use std::collections::{HashMap, HashSet};

use shared::{BodyId, CelestialBody};

use crate::state::settings::AnimationSettings;

pub struct OrbitAnimator {
    angles: HashMap<BodyId, f64>,
    /// Timestamp (seconds) of the last animated tick; `None` right after
    /// start, pause, or clear
    last_tick: Option<f64>,
    /// Timestamp of the last gate pass, animated or not
    last_gate: Option<f64>,
    tick_interval: f64,
    speed_multiplier: f64,
    /// System generation the cache belongs to
    generation: u64,
}

impl Default for OrbitAnimator {
    fn default() -> Self {
        Self::from_settings(&AnimationSettings::default())
    }
}

impl OrbitAnimator {
    pub fn new(tick_hz: f64, speed_multiplier: f64) -> Self {
        let tick_hz = if tick_hz > 0.0 { tick_hz } else { 30.0 };
        Self {
            angles: HashMap::new(),
            last_tick: None,
            last_gate: None,
            // 30 Hz gives the classic 33 ms gate
            tick_interval: (1.0 / tick_hz * 1000.0).floor() / 1000.0,
            speed_multiplier,
            generation: 0,
        }
    }

    pub fn from_settings(settings: &AnimationSettings) -> Self {
        Self::new(settings.tick_hz, settings.speed_multiplier)
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.speed_multiplier = multiplier;
    }

    pub fn tick_interval(&self) -> f64 {
        self.tick_interval
    }

    /// Drop all cached angles and restart timing
    pub fn clear(&mut self) {
        self.angles.clear();
        self.last_tick = None;
    }

    /// Clear the cache when the system identity changed
    pub fn sync_generation(&mut self, generation: u64) {
        if self.generation != generation {
            self.generation = generation;
            self.clear();
        }
    }

    /// Forget cached angles so the bodies reseed from their static angle
    pub fn forget(&mut self, ids: &[BodyId]) {
        for id in ids {
            self.angles.remove(id);
        }
    }

    /// Run one gated tick at wall-clock time `now` (seconds).
    ///
    /// Returns `true` when the gate opened. While animating, every body with a
    /// positive orbit distance advances by `speed * dt * multiplier`; the first
    /// animated tick after a start or clear uses `dt = 0`.
    pub fn tick(&mut self, now: f64, roots: &[CelestialBody], animating: bool) -> bool {
        if let Some(last) = self.last_gate {
            if now - last < self.tick_interval {
                return false;
            }
        }
        self.last_gate = Some(now);

        if !animating {
            self.last_tick = None;
            return true;
        }

        let dt = match self.last_tick {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.advance(roots, dt);
        true
    }

    /// Advance every orbiting body by `dt` seconds and prune entries for
    /// bodies that are no longer in the tree
    pub fn advance(&mut self, roots: &[CelestialBody], dt: f64) {
        let mut live = HashSet::new();
        for root in roots {
            self.advance_body(root, dt, &mut live);
        }
        self.angles.retain(|id, _| live.contains(id.as_str()));
    }

    fn advance_body<'a>(&mut self, body: &'a CelestialBody, dt: f64, live: &mut HashSet<&'a str>) {
        if body.orbit_distance > 0.0 {
            let current = self
                .angles
                .get(&body.id)
                .copied()
                .unwrap_or(body.orbit_angle);
            let next = (current + body.orbit_speed * dt * self.speed_multiplier).rem_euclid(360.0);
            self.angles.insert(body.id.clone(), next);
            live.insert(body.id.as_str());
        }
        for child in &body.children {
            self.advance_body(child, dt, live);
        }
    }

    /// Angle to render a body at. Static `orbit_angle` when not animating or
    /// not yet seeded.
    pub fn angle_of(&self, body: &CelestialBody, animating: bool) -> f64 {
        if !animating {
            return body.orbit_angle;
        }
        self.angles
            .get(&body.id)
            .copied()
            .unwrap_or(body.orbit_angle)
    }

    pub fn cached_angle(&self, id: &str) -> Option<f64> {
        self.angles.get(id).copied()
    }

    pub fn cached_len(&self) -> usize {
        self.angles.len()
    }
}
