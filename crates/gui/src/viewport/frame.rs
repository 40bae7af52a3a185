//! Per-frame scene walk.
//!
//! Turns the body tree plus view state into a flat list of draw commands and
//! hit regions in viewport-local screen coordinates. Painting them is left to
//! the egui panel, which keeps this walk testable without a UI context.

use egui::{Color32, TextureId};
use glam::DVec2;
use shared::CelestialBody;

use super::camera::{auto_fit_zoom, focus_pan, orbit_offset, world_position, ExtentCache};
use super::visuals::{self, Visual};
use crate::animator::OrbitAnimator;
use crate::state::settings::ViewportSettings;
use crate::state::system::SystemStore;
use crate::state::view::{Selection, ViewState};

pub const PLACEHOLDER_TEXT: &str = "No system loaded. Create or load a system to begin.";

/// Smallest clickable radius in pixels
const MIN_HIT_RADIUS: f64 = 4.0;
/// Extra half-width of a belt's hit band beyond its ring width
const BELT_HIT_MARGIN: f64 = 2.0;

/// Source of loaded sprite textures. Implementations may start a load as a
/// side effect and return `None` until it finishes.
pub trait SpriteLookup {
    fn texture_for(&mut self, sprite: &str) -> Option<TextureId>;
}

/// Lookup that never has a texture; everything draws as fallback discs
pub struct NoSprites;

impl SpriteLookup for NoSprites {
    fn texture_for(&mut self, _sprite: &str) -> Option<TextureId> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Orbit,
    Belt,
    BeltGuide,
    BeltSelection,
    Selection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Circle outline; the band spans `radius ± width / 2`
    Ring {
        kind: RingKind,
        center: DVec2,
        radius: f64,
        width: f64,
        color: Color32,
    },
    Disc {
        id: String,
        center: DVec2,
        radius: f64,
        color: Color32,
    },
    Sprite {
        id: String,
        texture: TextureId,
        center: DVec2,
        size: f64,
        rotation_deg: f64,
    },
    Placeholder {
        text: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Circle { center: DVec2, radius: f64 },
    Annulus { center: DVec2, inner: f64, outer: f64 },
}

impl HitShape {
    pub fn contains(&self, point: DVec2) -> bool {
        match *self {
            HitShape::Circle { center, radius } => point.distance(center) <= radius,
            HitShape::Annulus {
                center,
                inner,
                outer,
            } => {
                let d = point.distance(center);
                d >= inner && d <= outer
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub target: Selection,
    pub shape: HitShape,
}

/// Everything one frame needs to paint and to interpret input
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub auto_fit: f64,
    /// Effective zoom: auto-fit times user zoom
    pub zoom: f64,
    /// Screen position of the world origin
    pub origin: DVec2,
    pub commands: Vec<DrawCommand>,
    /// In draw order; later regions are on top
    pub hits: Vec<HitRegion>,
}

impl RenderFrame {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.commands.as_slice(), [DrawCommand::Placeholder { .. }])
    }

    /// Screen center of a drawn body, if it was drawn this frame
    pub fn body_center(&self, id: &str) -> Option<DVec2> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Disc { id: i, center, .. } | DrawCommand::Sprite { id: i, center, .. }
                if i == id =>
            {
                Some(*center)
            }
            _ => None,
        })
    }
}

/// Per-frame inputs that do not live in the stores
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    pub viewport_size: DVec2,
    /// Uncommitted pan from an in-progress drag
    pub drag_offset: DVec2,
    pub fit_padding: f64,
    pub selection_color: Color32,
}

impl FrameParams {
    pub fn new(viewport_size: DVec2, settings: &ViewportSettings) -> Self {
        let [r, g, b] = settings.selection_color;
        Self {
            viewport_size,
            drag_offset: DVec2::ZERO,
            fit_padding: settings.fit_padding,
            selection_color: Color32::from_rgb(r, g, b),
        }
    }

    pub fn center(&self) -> DVec2 {
        self.viewport_size * 0.5
    }
}

/// Render engine state that survives between frames
#[derive(Debug, Default)]
pub struct RenderEngine {
    extent: ExtentCache,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one frame.
    ///
    /// Publishes the effective zoom to `view` and, when a focus target is
    /// set, re-centers the camera on it before walking the tree.
    pub fn frame(
        &mut self,
        store: &SystemStore,
        view: &mut ViewState,
        animator: &OrbitAnimator,
        sprites: &mut dyn SpriteLookup,
        params: &FrameParams,
    ) -> RenderFrame {
        let extent = self.extent.get(store);
        let auto_fit = auto_fit_zoom(extent, params.viewport_size, params.fit_padding);
        let zoom = auto_fit * view.camera_zoom();
        view.publish_computed_zoom(zoom);

        let animating = view.is_animating;
        let focus = view.focus_target().map(|t| t.id.clone());
        if let Some(id) = focus {
            if let Some(pos) = world_position(store, &id, |b| animator.angle_of(b, animating)) {
                view.set_camera_position(focus_pan(pos, zoom));
            }
        }

        let origin = params.center() + view.camera_position() + params.drag_offset;

        if store.roots().is_empty() {
            return RenderFrame {
                auto_fit,
                zoom,
                origin,
                commands: vec![DrawCommand::Placeholder {
                    text: PLACEHOLDER_TEXT,
                }],
                hits: Vec::new(),
            };
        }

        let mut walk = Walk {
            view,
            animator,
            sprites,
            zoom,
            selection_color: params.selection_color,
            rings: Vec::new(),
            bodies: Vec::new(),
            belt_hits: Vec::new(),
            body_hits: Vec::new(),
        };
        for root in store.roots() {
            walk.body(root, origin);
        }

        let mut commands = walk.rings;
        commands.append(&mut walk.bodies);
        let mut hits = walk.belt_hits;
        hits.append(&mut walk.body_hits);

        RenderFrame {
            auto_fit,
            zoom,
            origin,
            commands,
            hits,
        }
    }
}

/// Rings are drawn under bodies, belts are hit-tested under bodies
struct Walk<'a> {
    view: &'a ViewState,
    animator: &'a OrbitAnimator,
    sprites: &'a mut dyn SpriteLookup,
    zoom: f64,
    selection_color: Color32,
    rings: Vec<DrawCommand>,
    bodies: Vec<DrawCommand>,
    belt_hits: Vec<HitRegion>,
    body_hits: Vec<HitRegion>,
}

impl Walk<'_> {
    fn body(&mut self, body: &CelestialBody, parent: DVec2) {
        let angle = self.animator.angle_of(body, self.view.is_animating);
        let position = parent + orbit_offset(angle, body.orbit_distance) * self.zoom;
        let look = visuals::resolve(body);

        if look.ring_only {
            self.belt(body, parent, &look);
        } else {
            self.orbiter(body, parent, position, &look);
        }

        for child in &body.children {
            self.body(child, position);
        }
    }

    fn belt(&mut self, body: &CelestialBody, parent: DVec2, look: &Visual) {
        let radius = body.orbit_distance * self.zoom;
        let half = look.ring_width;
        let hit_half = half + BELT_HIT_MARGIN;

        self.rings.push(DrawCommand::Ring {
            kind: RingKind::Belt,
            center: parent,
            radius,
            width: half * 2.0,
            color: look.ring_color,
        });
        if self.view.show_orbits {
            self.rings.push(DrawCommand::Ring {
                kind: RingKind::BeltGuide,
                center: parent,
                radius: radius + hit_half,
                width: 1.0,
                color: look.ring_color.gamma_multiply(0.5),
            });
        }
        if self.view.is_selected(&body.id) {
            self.rings.push(DrawCommand::Ring {
                kind: RingKind::BeltSelection,
                center: parent,
                radius,
                width: hit_half * 2.0,
                color: self.selection_color.gamma_multiply(0.3),
            });
        }

        self.belt_hits.push(HitRegion {
            target: Selection::of(body),
            shape: HitShape::Annulus {
                center: parent,
                inner: (radius - hit_half).max(0.0),
                outer: radius + hit_half,
            },
        });
    }

    fn orbiter(&mut self, body: &CelestialBody, parent: DVec2, position: DVec2, look: &Visual) {
        if self.view.show_orbits && body.orbit_distance > 0.0 && look.ring_width > 0.0 {
            self.rings.push(DrawCommand::Ring {
                kind: RingKind::Orbit,
                center: parent,
                radius: body.orbit_distance * self.zoom,
                width: look.ring_width * 2.0,
                color: look.ring_color,
            });
        }

        let size = look.base_size * body.scale * self.zoom;
        let radius = size / 2.0;
        let texture = if body.sprite.is_empty() {
            None
        } else {
            self.sprites.texture_for(&body.sprite)
        };
        match texture {
            Some(texture) => self.bodies.push(DrawCommand::Sprite {
                id: body.id.clone(),
                texture,
                center: position,
                size,
                rotation_deg: body.rotation,
            }),
            None => self.bodies.push(DrawCommand::Disc {
                id: body.id.clone(),
                center: position,
                radius,
                color: look.fill,
            }),
        }

        if self.view.is_selected(&body.id) {
            // band from 1/6 to 1/3 of the radius outside the body
            self.bodies.push(DrawCommand::Ring {
                kind: RingKind::Selection,
                center: position,
                radius: radius * 1.25,
                width: radius / 6.0,
                color: self.selection_color,
            });
        }

        self.body_hits.push(HitRegion {
            target: Selection::of(body),
            shape: HitShape::Circle {
                center: position,
                radius: radius.max(MIN_HIT_RADIUS),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::defaults::{default_asteroid_belt, default_moon, default_planet, default_star};
    use shared::SolarSystem;

    const SIZE: DVec2 = DVec2::new(900.0, 700.0);

    fn params() -> FrameParams {
        FrameParams::new(SIZE, &ViewportSettings::default())
    }

    fn store_with(roots: Vec<CelestialBody>) -> SystemStore {
        let mut store = SystemStore::with_seed(7);
        store.load_system(
            SolarSystem {
                id: "s".into(),
                name: "Sol".into(),
                bounds: Default::default(),
            },
            roots,
        );
        store
    }

    /// Star, one planet at 400 / 0 degrees with a moon at 40 / 90 degrees
    fn sample() -> SystemStore {
        let mut star = default_star("Sol", 0);
        let mut planet = default_planet("Sol", "Sol", 1, 0.0);
        planet.orbit_distance = 360.0;
        let mut moon = default_moon("Sol 1", 'a', 90.0);
        moon.orbit_distance = 40.0;
        planet.children.push(moon);
        star.children.push(planet);
        store_with(vec![star])
    }

    fn frame(store: &SystemStore, view: &mut ViewState) -> RenderFrame {
        let animator = OrbitAnimator::default();
        RenderEngine::new().frame(store, view, &animator, &mut NoSprites, &params())
    }

    #[test]
    fn test_empty_tree_renders_placeholder() {
        let store = SystemStore::with_seed(1);
        let mut view = ViewState::default();
        let f = frame(&store, &mut view);
        assert!(f.is_placeholder());
        assert!(f.hits.is_empty());
    }

    #[test]
    fn test_auto_fit_published_as_computed_zoom() {
        let store = sample();
        let mut view = ViewState::default();
        view.set_camera_zoom(2.0);
        let f = frame(&store, &mut view);
        // extent 400, (700 - 100) / 800
        assert!((f.auto_fit - 0.75).abs() < 1e-12);
        assert!((f.zoom - 1.5).abs() < 1e-12);
        assert!((view.computed_zoom() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_positions_compose_through_parents() {
        let store = sample();
        let mut view = ViewState::default();
        view.is_animating = false;
        let f = frame(&store, &mut view);
        let center = SIZE * 0.5;
        assert_eq!(f.body_center("Sol"), Some(center));

        let planet = f.body_center("Sol 1").unwrap();
        assert!((planet - (center + DVec2::new(270.0, 0.0))).length() < 1e-9);

        let moon = f.body_center("Sol 1 a").unwrap();
        assert!((moon - (planet + DVec2::new(0.0, 30.0))).length() < 1e-9);
    }

    #[test]
    fn test_fallback_disc_radius() {
        let store = sample();
        let mut view = ViewState::default();
        let f = frame(&store, &mut view);
        let radius = f
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Disc { id, radius, .. } if id == "Sol 1" => Some(*radius),
                _ => None,
            })
            .unwrap();
        // 48 / 2 * scale 1 * zoom 0.75
        assert!((radius - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_rings_follow_show_orbits() {
        let store = sample();
        let mut view = ViewState::default();
        let rings = |f: &RenderFrame| {
            f.commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Ring { kind: RingKind::Orbit, .. }))
                .count()
        };
        let f = frame(&store, &mut view);
        // planet and moon; the star has no orbit
        assert_eq!(rings(&f), 2);

        view.show_orbits = false;
        let f = frame(&store, &mut view);
        assert_eq!(rings(&f), 0);
    }

    #[test]
    fn test_selection_ring_for_selected_body() {
        let store = sample();
        let mut view = ViewState::default();
        let moon = store.find_body("Sol 1 a").unwrap();
        view.select(Some(Selection::of(moon)));
        let f = frame(&store, &mut view);
        let selected: Vec<_> = f
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ring { kind: RingKind::Selection, .. }))
            .collect();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_belt_is_ring_and_hit_target() {
        let mut roots = vec![default_star("Sol", 0)];
        roots.push(default_asteroid_belt("Sol", 1));
        let store = store_with(roots);
        let mut view = ViewState::default();
        let f = frame(&store, &mut view);

        assert!(f.body_center("Sol Belt 1").is_none());
        assert!(f
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Ring { kind: RingKind::Belt, .. })));
        assert!(f
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Ring { kind: RingKind::BeltGuide, .. })));
        let belt_hit = f
            .hits
            .iter()
            .find(|h| h.target.id == "Sol Belt 1")
            .unwrap();
        assert!(matches!(belt_hit.shape, HitShape::Annulus { .. }));
        // belts sit below bodies in hit order
        assert_eq!(f.hits.first().map(|h| h.target.id.as_str()), Some("Sol Belt 1"));
    }

    #[test]
    fn test_focus_follow_centers_target() {
        let store = sample();
        let mut view = ViewState::default();
        view.is_animating = false;
        let moon = store.find_body("Sol 1 a").unwrap();
        view.set_focus_target(Some(Selection::of(moon)));
        let f = frame(&store, &mut view);
        let center = SIZE * 0.5;
        assert!((f.body_center("Sol 1 a").unwrap() - center).length() < 1e-9);
        // -(360, 40) * 0.75
        assert!((view.camera_position() - DVec2::new(-270.0, -30.0)).length() < 1e-9);
    }

    #[test]
    fn test_missing_focus_target_keeps_pan() {
        let store = sample();
        let mut view = ViewState::default();
        view.set_camera_position(DVec2::new(12.0, 5.0));
        view.set_focus_target(Some(Selection {
            kind: shared::BodyType::Planet,
            id: "Sol 9".into(),
            parent_id: Some("Sol".into()),
        }));
        frame(&store, &mut view);
        assert_eq!(view.camera_position(), DVec2::new(12.0, 5.0));
    }

    #[test]
    fn test_sprite_used_when_loaded() {
        struct OneSprite;
        impl SpriteLookup for OneSprite {
            fn texture_for(&mut self, sprite: &str) -> Option<TextureId> {
                (sprite == "earth.png").then_some(TextureId::User(1))
            }
        }

        let mut star = default_star("Sol", 0);
        let mut planet = default_planet("Sol", "Sol", 1, 0.0);
        planet.sprite = "earth.png".into();
        planet.rotation = 30.0;
        star.sprite = "missing.png".into();
        star.children.push(planet);
        let store = store_with(vec![star]);

        let mut view = ViewState::default();
        let animator = OrbitAnimator::default();
        let f = RenderEngine::new().frame(&store, &mut view, &animator, &mut OneSprite, &params());

        assert!(f.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Sprite { id, rotation_deg, .. } if id == "Sol 1" && *rotation_deg == 30.0
        )));
        assert!(f
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Disc { id, .. } if id == "Sol")));
    }

    #[test]
    fn test_drag_offset_moves_origin_without_committing() {
        let store = sample();
        let mut view = ViewState::default();
        let mut p = params();
        p.drag_offset = DVec2::new(20.0, -10.0);
        let animator = OrbitAnimator::default();
        let f = RenderEngine::new().frame(&store, &mut view, &animator, &mut NoSprites, &p);
        assert_eq!(f.origin, SIZE * 0.5 + DVec2::new(20.0, -10.0));
        assert_eq!(view.camera_position(), DVec2::ZERO);
    }
}
