//! System state management
//!
//! Owns the canonical body forest and the system metadata. Every structural
//! mutation goes through [`SystemStore`], which is also the only writer of the
//! dirty flag.

mod body_ops;
mod display;
mod factories;
mod lifecycle;
mod persistence;

pub use body_ops::BodyPatch;
pub use display::{body_display_name, body_icon, body_sublabel, type_label};

use rand::{rngs::StdRng, SeedableRng};
use shared::{BodyType, CelestialBody, SolarSystem};
use thiserror::Error;

/// Structural failures reported by the store. The tree is never modified when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("no system loaded")]
    NoSystem,
    #[error("body '{0}' not found")]
    BodyNotFound(String),
    #[error("parent '{0}' not found")]
    ParentNotFound(String),
    #[error("body id '{0}' already exists")]
    DuplicateId(String),
    #[error("body '{id}' has parentId {actual:?}, expected {expected:?}")]
    ParentMismatch {
        id: String,
        expected: Option<String>,
        actual: Option<String>,
    },
    #[error("cannot change '{id}' from {from} to {to}")]
    KindMismatch {
        id: String,
        from: BodyType,
        to: BodyType,
    },
    #[error("'{id}' is a {actual}, expected {expected}")]
    WrongParentKind {
        id: String,
        actual: BodyType,
        expected: &'static str,
    },
    #[error("invalid value for '{id}': {reason}")]
    InvalidValue { id: String, reason: String },
    #[error("no free name left for a new {kind} under '{parent}'")]
    NamingExhausted { kind: BodyType, parent: String },
    #[error("cannot remove the last root star '{0}'")]
    LastStar(String),
}

/// Point in the store's history: which system, and which edit of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    pub version: u64,
    pub generation: u64,
}

/// Canonical system state
pub struct SystemStore {
    /// Metadata of the active system, `None` before anything is created or loaded
    system: Option<SolarSystem>,
    /// Root bodies (parentId = None), in insertion order
    roots: Vec<CelestialBody>,
    dirty: bool,
    /// Monotonically increasing version counter for cache invalidation
    version: u64,
    /// Bumped whenever the active system identity changes
    generation: u64,
    rng: StdRng,
}

impl Default for SystemStore {
    fn default() -> Self {
        Self {
            system: None,
            roots: Vec::new(),
            dirty: false,
            version: 0,
            generation: 0,
            rng: StdRng::from_entropy(),
        }
    }
}

impl SystemStore {
    /// Store with a fixed seed for initial orbit angles
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::default()
        }
    }

    pub fn system(&self) -> Option<&SolarSystem> {
        self.system.as_ref()
    }

    pub fn system_name(&self) -> Option<&str> {
        self.system.as_ref().map(|s| s.name.as_str())
    }

    pub fn roots(&self) -> &[CelestialBody] {
        &self.roots
    }

    pub fn has_system(&self) -> bool {
        self.system.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current system identity (increments on new/load/clear)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn revision(&self) -> Revision {
        Revision {
            version: self.version,
            generation: self.generation,
        }
    }

    /// Total number of bodies in the forest
    pub fn body_count(&self) -> usize {
        self.roots.iter().map(|r| r.subtree_len()).sum()
    }

    /// Depth-first search over the forest
    pub fn find_body(&self, id: &str) -> Option<&CelestialBody> {
        find_in(&self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_body(id).is_some()
    }

    /// Parent of a body, `None` for roots and unknown ids
    pub fn parent_of(&self, id: &str) -> Option<&CelestialBody> {
        let parent_id = self.find_body(id)?.parent_id.as_deref()?;
        self.find_body(parent_id)
    }

    pub(crate) fn find_body_mut(&mut self, id: &str) -> Option<&mut CelestialBody> {
        find_in_mut(&mut self.roots, id)
    }

    /// Record a mutation
    pub(crate) fn touch(&mut self) {
        self.dirty = true;
        self.version += 1;
    }

    /// Record a change of system identity
    pub(crate) fn replace_identity(&mut self) {
        self.generation += 1;
        self.version += 1;
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

pub(crate) fn find_in<'a>(bodies: &'a [CelestialBody], id: &str) -> Option<&'a CelestialBody> {
    for body in bodies {
        if body.id == id {
            return Some(body);
        }
        if let Some(found) = find_in(&body.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(bodies: &'a mut [CelestialBody], id: &str) -> Option<&'a mut CelestialBody> {
    for body in bodies.iter_mut() {
        if body.id == id {
            return Some(body);
        }
        if let Some(found) = find_in_mut(&mut body.children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::defaults::{default_moon, default_planet, default_star};

    fn sample() -> SystemStore {
        let mut store = SystemStore::with_seed(1);
        store.new_system("Sol");
        store
    }

    #[test]
    fn test_default_store_is_empty() {
        let store = SystemStore::default();
        assert!(!store.has_system());
        assert!(store.roots().is_empty());
        assert!(!store.is_dirty());
        assert_eq!(store.body_count(), 0);
    }

    #[test]
    fn test_find_nested_body() {
        let mut store = sample();
        store.add_body(default_planet("Sol", "Sol", 1, 0.0)).unwrap();
        store.add_body(default_moon("Sol 1", 'a', 0.0)).unwrap();

        assert_eq!(store.find_body("Sol 1 a").map(|b| b.id.as_str()), Some("Sol 1 a"));
        assert_eq!(store.parent_of("Sol 1 a").map(|b| b.id.as_str()), Some("Sol 1"));
        assert!(store.parent_of("Sol").is_none());
        assert!(store.find_body("Sol 9").is_none());
        assert_eq!(store.body_count(), 3);
    }

    #[test]
    fn test_find_prefers_first_root() {
        let mut store = sample();
        let companion = default_star("Sol", 1);
        store.add_body(companion).unwrap();
        assert_eq!(store.roots().len(), 2);
        assert_eq!(store.find_body("Sol A").map(|b| b.id.as_str()), Some("Sol A"));
    }

    #[test]
    fn test_tree_error_messages() {
        assert_eq!(
            TreeError::ParentNotFound("Vega".into()).to_string(),
            "parent 'Vega' not found"
        );
        assert_eq!(TreeError::NoSystem.to_string(), "no system loaded");
    }
}
