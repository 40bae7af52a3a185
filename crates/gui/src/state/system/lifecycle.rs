//! Whole-system operations: create, load, clear, rename

use shared::defaults::default_star;
use shared::validation::{self, ValidationError};
use shared::{Bounds, CelestialBody, SolarSystem, SystemFile};

use super::{Revision, SystemStore, TreeError};

impl SystemStore {
    /// Replace state with a fresh system holding one root star named after it.
    pub fn new_system(&mut self, name: &str) {
        let name = name.trim();
        let name = if name.is_empty() { "New System" } else { name };

        self.system = Some(SolarSystem {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            bounds: Bounds::default(),
        });
        self.roots = vec![default_star(name, 0)];
        self.replace_identity();
        self.dirty = true;
        tracing::info!("New system '{}'", name);
    }

    /// Replace state wholesale with already-validated data. The store is clean
    /// afterwards.
    pub fn load_system(&mut self, system: SolarSystem, roots: Vec<CelestialBody>) {
        tracing::info!(
            "Loaded system '{}' ({} root bodies)",
            system.name,
            roots.len()
        );
        self.system = Some(system);
        self.roots = roots;
        self.replace_identity();
        self.dirty = false;
    }

    /// Validate a document and load it. Invalid input leaves the store untouched.
    pub fn load_file(&mut self, file: SystemFile) -> Result<(), ValidationError> {
        validation::validate_file(&file)?;
        self.load_system(file.system, file.root_bodies);
        Ok(())
    }

    /// Snapshot of the current system as a document
    pub fn to_file(&self) -> Option<SystemFile> {
        let system = self.system.clone()?;
        Some(SystemFile::new(system, self.roots.clone()))
    }

    /// Drop the active system
    pub fn clear_system(&mut self) {
        self.system = None;
        self.roots.clear();
        self.replace_identity();
        self.dirty = false;
    }

    /// Rename the system. Body ids are not rewritten.
    pub fn set_system_name(&mut self, name: &str) -> Result<(), TreeError> {
        let system = self.system.as_mut().ok_or(TreeError::NoSystem)?;
        if system.name != name {
            system.name = name.to_string();
            self.touch();
        }
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<(), TreeError> {
        if !(bounds.width > 0.0 && bounds.height > 0.0) {
            return Err(TreeError::InvalidValue {
                id: "system".into(),
                reason: "bounds must be positive".into(),
            });
        }
        let system = self.system.as_mut().ok_or(TreeError::NoSystem)?;
        system.bounds = bounds;
        self.touch();
        Ok(())
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Clear the dirty flag for a save of the snapshot taken at `saved`.
    /// Returns false, leaving the flag alone, when the store has moved on
    /// since (later edits or another system).
    pub fn mark_clean_at(&mut self, saved: Revision) -> bool {
        if self.revision() != saved {
            tracing::debug!(
                "Save of {:?} finished after changes ({:?}), keeping dirty flag",
                saved,
                self.revision()
            );
            return false;
        }
        self.dirty = false;
        true
    }

    /// Whether there are unsaved edits made after `since`
    pub fn edited_since(&self, since: Revision) -> bool {
        self.dirty && self.revision() != since
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::BodyType;

    #[test]
    fn test_new_system_has_single_star() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");

        assert_eq!(store.system_name(), Some("Sol"));
        assert_eq!(store.roots().len(), 1);
        let star = &store.roots()[0];
        assert_eq!(star.id, "Sol");
        assert_eq!(star.body_type(), BodyType::Star);
        assert!(store.is_dirty());
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn test_new_system_blank_name() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("   ");
        assert_eq!(store.system_name(), Some("New System"));
    }

    #[test]
    fn test_new_system_gets_fresh_id() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        let first = store.system().unwrap().id.clone();
        store.new_system("Sol");
        assert_ne!(store.system().unwrap().id, first);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_load_round_trip_is_clean() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        store.add_planet("Sol").unwrap();
        store.add_moon("Sol 1").unwrap();
        let saved = store.to_file().unwrap();

        let mut other = SystemStore::with_seed(9);
        other.load_file(saved.clone()).unwrap();
        assert!(!other.is_dirty());
        assert_eq!(other.roots(), saved.root_bodies.as_slice());
        assert_eq!(other.system(), Some(&saved.system));
    }

    #[test]
    fn test_invalid_load_leaves_state() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        store.add_planet("Sol").unwrap();
        let generation = store.generation();

        let mut bad = store.to_file().unwrap();
        bad.root_bodies.clear();
        assert!(store.load_file(bad).is_err());
        assert!(store.find_body("Sol 1").is_some());
        assert!(store.is_dirty());
        assert_eq!(store.generation(), generation);
    }

    #[test]
    fn test_clear_system() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        store.clear_system();
        assert!(!store.has_system());
        assert!(store.roots().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_rename_marks_dirty() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        store.mark_clean();
        store.set_system_name("Vega").unwrap();
        assert_eq!(store.system_name(), Some("Vega"));
        assert!(store.is_dirty());
        // body ids are untouched
        assert!(store.find_body("Sol").is_some());
    }

    #[test]
    fn test_bounds_must_be_positive() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        assert!(store
            .set_bounds(Bounds {
                width: 0.0,
                height: 10.0
            })
            .is_err());
        store
            .set_bounds(Bounds {
                width: 500.0,
                height: 400.0,
            })
            .unwrap();
        assert_eq!(store.system().unwrap().bounds.width, 500.0);
    }

    #[test]
    fn test_mark_clean_at_matching_revision() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        let saved = store.revision();
        assert!(store.mark_clean_at(saved));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_mark_clean_at_keeps_later_edits_dirty() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        let saved = store.revision();
        store.add_planet("Sol").unwrap();

        assert!(!store.mark_clean_at(saved));
        assert!(store.is_dirty());
        assert!(store.edited_since(saved));
    }

    #[test]
    fn test_mark_clean_at_ignores_previous_system() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        store.add_planet("Sol").unwrap();
        let saved = store.revision();

        // new system while the save of the old one is in flight
        store.new_system("Vega");
        assert!(!store.mark_clean_at(saved));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_edited_since() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        let requested = store.revision();
        assert!(!store.edited_since(requested));

        store.mark_clean();
        store.add_planet("Sol").unwrap();
        assert!(store.edited_since(requested));

        store.mark_clean();
        assert!(!store.edited_since(requested));
    }

    #[test]
    fn test_sol_scenario() {
        let mut store = SystemStore::with_seed(5);
        store.new_system("Sol");
        assert_eq!(store.roots()[0].id, "Sol");

        let planet = store.add_planet("Sol").unwrap();
        assert_eq!(planet, "Sol 1");
        assert_eq!(store.find_body("Sol 1").unwrap().planet_number(), Some(1));
        assert!(store.is_dirty());

        let moon = store.add_moon("Sol 1").unwrap();
        assert_eq!(moon, "Sol 1 a");
        assert_eq!(store.find_body("Sol 1 a").unwrap().moon_letter(), Some('a'));

        store.remove_body("Sol 1").unwrap();
        assert!(store.find_body("Sol 1 a").is_none());
        assert!(store.is_dirty());

        store.mark_clean();
        assert!(!store.is_dirty());
    }
}
