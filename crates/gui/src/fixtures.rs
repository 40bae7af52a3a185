//! Built-in systems and factory helpers for tests.
//!
//! `sol_system` is the template offered by "Load Sol" and opened at startup
//! when nothing else is requested.

use shared::defaults::{
    default_asteroid_belt, default_moon, default_planet, default_star, default_station,
};
use shared::*;

// ── Sol template ──────────────────────────────────────────────

const SOL_PLANETS: [(&str, f64, f64, &[&str]); 8] = [
    ("Mercury", 0.4, 4.1, &[]),
    ("Venus", 0.9, 1.6, &[]),
    ("Earth", 1.0, 1.0, &["Moon"]),
    ("Mars", 0.6, 0.53, &["Phobos", "Deimos"]),
    ("Jupiter", 2.2, 0.084, &["Io", "Europa", "Ganymede", "Callisto"]),
    ("Saturn", 1.9, 0.034, &["Titan", "Enceladus"]),
    ("Uranus", 1.5, 0.012, &["Titania"]),
    ("Neptune", 1.4, 0.006, &["Triton"]),
];

/// The Sol template: eight planets, their major moons, one station and the
/// main belt between Mars and Jupiter
pub fn sol_system() -> SystemFile {
    let mut sun = default_star("Sol", 0);
    sun.name = "Sun".to_string();
    sun.description = "G-type main-sequence star".to_string();
    sun.scale = 1.5;
    sun.rotation_speed = 2.0;

    for (i, (name, scale, speed, moons)) in SOL_PLANETS.iter().enumerate() {
        let number = i as u32 + 1;
        let mut planet = default_planet("Sol", &sun.id, number, f64::from(number) * 45.0);
        planet.name = name.to_string();
        planet.scale = *scale;
        // scaled so Mercury does not spin through a full orbit every second
        planet.orbit_speed = (speed * 4.0).max(0.05);

        for (m, moon_name) in moons.iter().enumerate() {
            let Some(letter) = naming::moon_letter(m) else {
                continue;
            };
            let mut moon = default_moon(&planet.id, letter, m as f64 * 90.0);
            moon.name = moon_name.to_string();
            planet.children.push(moon);
        }

        if *name == "Earth" {
            let mut station = default_station(&planet.id, StationType::Research, 1, 180.0);
            station.name = "Orbital Research Station".to_string();
            planet.children.push(station);
        }
        sun.children.push(planet);
    }

    let mut belt = default_asteroid_belt("Sol", 1);
    belt.name = "Main Belt".to_string();
    // between Mars (340) and Jupiter (420)
    belt.orbit_distance = 380.0;

    SystemFile::new(
        SolarSystem {
            id: "sol-template".to_string(),
            name: "Sol".to_string(),
            bounds: Bounds::default(),
        },
        vec![sun, belt],
    )
}

// ── Test factories ──────────────────────────────────────────────

/// System metadata with a fixed id
pub fn system_meta(name: &str) -> SolarSystem {
    SolarSystem {
        id: format!("{}-id", naming::file_stem(name)),
        name: name.to_string(),
        bounds: Bounds::default(),
    }
}

/// A star with `planets` default planets at angle 0
pub fn star_with_planets(system_name: &str, planets: u32) -> CelestialBody {
    let mut star = default_star(system_name, 0);
    for n in 1..=planets {
        let planet = default_planet(system_name, &star.id, n, 0.0);
        star.children.push(planet);
    }
    star
}

/// A document holding a single star with `planets` planets
pub fn simple_file(system_name: &str, planets: u32) -> SystemFile {
    SystemFile::new(
        system_meta(system_name),
        vec![star_with_planets(system_name, planets)],
    )
}
