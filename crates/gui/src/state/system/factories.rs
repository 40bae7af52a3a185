//! Typed add helpers: pick the next free number/letter among siblings and
//! build the body from the shared defaults.
//!
//! Numbering is gap-tolerant: a new planet takes the highest existing number
//! plus one, so ids freed by a delete are never reissued to a different body
//! position and existing bodies are never renumbered.

use shared::defaults::{
    default_asteroid_belt, default_moon, default_planet, default_star, default_station,
    random_orbit_angle,
};
use shared::{naming, BodyId, BodyKind, BodyType, CelestialBody, StationType};

use super::{SystemStore, TreeError};

impl SystemStore {
    /// Add the next planet under a star. Returns the new id.
    pub fn add_planet(&mut self, star_id: &str) -> Result<BodyId, TreeError> {
        let system_name = self.system_name().ok_or(TreeError::NoSystem)?.to_string();
        let star = self.expect_parent(star_id, &[BodyType::Star], "a star")?;

        let next = star
            .children
            .iter()
            .filter_map(|c| c.planet_number())
            .max()
            .unwrap_or(0)
            + 1;

        let angle = random_orbit_angle(self.rng());
        let planet = default_planet(&system_name, star_id, next, angle);
        let id = planet.id.clone();
        self.add_body(planet)?;
        Ok(id)
    }

    /// Add the next moon under a planet. Returns the new id.
    pub fn add_moon(&mut self, planet_id: &str) -> Result<BodyId, TreeError> {
        let planet = self.expect_parent(planet_id, &[BodyType::Planet], "a planet")?;

        let next_index = planet
            .children
            .iter()
            .filter_map(|c| c.moon_letter().and_then(naming::moon_index))
            .max()
            .map_or(0, |i| i + 1);
        let letter = naming::moon_letter(next_index).ok_or_else(|| TreeError::NamingExhausted {
            kind: BodyType::Moon,
            parent: planet_id.to_string(),
        })?;

        let angle = random_orbit_angle(self.rng());
        let moon = default_moon(planet_id, letter, angle);
        let id = moon.id.clone();
        self.add_body(moon)?;
        Ok(id)
    }

    /// Add a station orbiting a planet or moon. Returns the new id.
    pub fn add_station(
        &mut self,
        parent_id: &str,
        station_type: StationType,
    ) -> Result<BodyId, TreeError> {
        let parent = self.expect_parent(
            parent_id,
            &[BodyType::Planet, BodyType::Moon],
            "a planet or moon",
        )?;

        let mut index = parent
            .children
            .iter()
            .filter(|c| c.station_type() == Some(station_type))
            .count() as u32
            + 1;
        while self.contains(&naming::station_id(parent_id, station_type, index)) {
            index += 1;
        }

        let angle = random_orbit_angle(self.rng());
        let station = default_station(parent_id, station_type, index, angle);
        let id = station.id.clone();
        self.add_body(station)?;
        Ok(id)
    }

    /// Add the next asteroid belt as a root ring. Returns the new id.
    pub fn add_asteroid_belt(&mut self) -> Result<BodyId, TreeError> {
        let system_name = self.system_name().ok_or(TreeError::NoSystem)?.to_string();

        let mut index = self
            .roots()
            .iter()
            .filter_map(|r| match r.kind {
                BodyKind::Asteroid { belt_index } => Some(belt_index.unwrap_or(1)),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        while self.contains(&naming::asteroid_belt_id(&system_name, index)) {
            index += 1;
        }

        let mut belt = default_asteroid_belt(&system_name, index);
        // each further belt sits outside the previous one
        belt.orbit_distance += f64::from(index - 1) * 150.0;
        let id = belt.id.clone();
        self.add_body(belt)?;
        Ok(id)
    }

    /// Add a companion root star (`Sol A`, `Sol B`, ...). Returns the new id.
    pub fn add_companion_star(&mut self) -> Result<BodyId, TreeError> {
        let system_name = self.system_name().ok_or(TreeError::NoSystem)?.to_string();

        let mut index = 1;
        while self.contains(&naming::star_id(&system_name, index)) {
            index += 1;
        }
        if naming::star_letter(index).is_none() {
            return Err(TreeError::NamingExhausted {
                kind: BodyType::Star,
                parent: system_name,
            });
        }

        let star = default_star(&system_name, index);
        let id = star.id.clone();
        self.add_body(star)?;
        Ok(id)
    }

    /// Number of root stars
    pub fn star_count(&self) -> usize {
        self.roots()
            .iter()
            .filter(|r| r.body_type() == BodyType::Star)
            .count()
    }

    /// Remove a body, refusing to drop the last root star
    pub fn remove_body_checked(&mut self, id: &str) -> Result<Vec<BodyId>, TreeError> {
        let body = self
            .find_body(id)
            .ok_or_else(|| TreeError::BodyNotFound(id.to_string()))?;
        if body.is_root() && body.body_type() == BodyType::Star && self.star_count() <= 1 {
            return Err(TreeError::LastStar(id.to_string()));
        }
        self.remove_body(id)
    }

    fn expect_parent(
        &self,
        id: &str,
        allowed: &[BodyType],
        expected: &'static str,
    ) -> Result<&CelestialBody, TreeError> {
        if !self.has_system() {
            return Err(TreeError::NoSystem);
        }
        let parent = self
            .find_body(id)
            .ok_or_else(|| TreeError::ParentNotFound(id.to_string()))?;
        if !allowed.contains(&parent.body_type()) {
            return Err(TreeError::WrongParentKind {
                id: id.to_string(),
                actual: parent.body_type(),
                expected,
            });
        }
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol() -> SystemStore {
        let mut store = SystemStore::with_seed(11);
        store.new_system("Sol");
        store
    }

    #[test]
    fn test_planets_numbered_in_order() {
        let mut store = sol();
        for expected in 1..=4u32 {
            let id = store.add_planet("Sol").unwrap();
            assert_eq!(id, format!("Sol {}", expected));
            assert_eq!(store.find_body(&id).unwrap().planet_number(), Some(expected));
        }
    }

    #[test]
    fn test_moons_lettered_in_order() {
        let mut store = sol();
        store.add_planet("Sol").unwrap();
        let letters: Vec<char> = (0..3)
            .map(|_| {
                let id = store.add_moon("Sol 1").unwrap();
                store.find_body(&id).unwrap().moon_letter().unwrap()
            })
            .collect();
        assert_eq!(letters, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_numbering_tolerates_gaps() {
        let mut store = sol();
        store.add_planet("Sol").unwrap();
        store.add_planet("Sol").unwrap();
        store.add_planet("Sol").unwrap();
        store.remove_body("Sol 2").unwrap();

        // remaining planets keep their numbers
        assert!(store.find_body("Sol 3").is_some());
        assert_eq!(store.add_planet("Sol").unwrap(), "Sol 4");
    }

    #[test]
    fn test_companion_star_planets() {
        let mut store = sol();
        assert_eq!(store.add_companion_star().unwrap(), "Sol A");
        assert_eq!(store.add_planet("Sol A").unwrap(), "Sol A 1");
        assert_eq!(store.star_count(), 2);
    }

    #[test]
    fn test_moon_needs_planet_parent() {
        let mut store = sol();
        assert_eq!(
            store.add_moon("Sol"),
            Err(TreeError::WrongParentKind {
                id: "Sol".into(),
                actual: BodyType::Star,
                expected: "a planet"
            })
        );
        assert_eq!(
            store.add_moon("Sol 7"),
            Err(TreeError::ParentNotFound("Sol 7".into()))
        );
    }

    #[test]
    fn test_moon_letters_run_out() {
        let mut store = sol();
        store.add_planet("Sol").unwrap();
        for _ in 0..26 {
            store.add_moon("Sol 1").unwrap();
        }
        assert!(matches!(
            store.add_moon("Sol 1"),
            Err(TreeError::NamingExhausted { .. })
        ));
    }

    #[test]
    fn test_stations_by_type() {
        let mut store = sol();
        store.add_planet("Sol").unwrap();
        let a = store.add_station("Sol 1", StationType::Research).unwrap();
        let b = store.add_station("Sol 1", StationType::Research).unwrap();
        let c = store.add_station("Sol 1", StationType::Trade).unwrap();
        assert_eq!(a, "Sol 1 Research 1");
        assert_eq!(b, "Sol 1 Research 2");
        assert_eq!(c, "Sol 1 Trade 1");
    }

    #[test]
    fn test_belts_are_roots() {
        let mut store = sol();
        let first = store.add_asteroid_belt().unwrap();
        let second = store.add_asteroid_belt().unwrap();
        assert_eq!(first, "Sol Belt 1");
        assert_eq!(second, "Sol Belt 2");
        let b2 = store.find_body(&second).unwrap();
        assert!(b2.is_root());
        assert_eq!(b2.orbit_distance, 350.0);
    }

    #[test]
    fn test_last_star_cannot_be_removed() {
        let mut store = sol();
        assert_eq!(
            store.remove_body_checked("Sol"),
            Err(TreeError::LastStar("Sol".into()))
        );
        store.add_companion_star().unwrap();
        assert!(store.remove_body_checked("Sol").is_ok());
    }

    #[test]
    fn test_helpers_require_system() {
        let mut store = SystemStore::default();
        assert_eq!(store.add_planet("Sol"), Err(TreeError::NoSystem));
        assert_eq!(store.add_asteroid_belt(), Err(TreeError::NoSystem));
    }
}
