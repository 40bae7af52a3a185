//! Фабрики тел со значениями по умолчанию.
//!
//! Идентификатор строится по схеме из [`crate::naming`], дочерних тел нет.
//! Начальный угол орбиты передаётся вызывающим кодом (см. [`random_orbit_angle`]).

use rand::Rng;

use crate::{naming, BodyKind, CelestialBody, StationType};

/// Случайный начальный угол орбиты в градусах, [0, 360)
pub fn random_orbit_angle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..360.0)
}

fn blank(id: String, kind: BodyKind, parent_id: Option<String>) -> CelestialBody {
    CelestialBody {
        name: id.clone(),
        id,
        description: String::new(),
        kind,
        sprite: String::new(),
        scale: 1.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        parent_id,
        orbit_distance: 0.0,
        orbit_speed: 0.0,
        orbit_angle: 0.0,
        children: Vec::new(),
        base_size: None,
        fallback_color: None,
        orbit_ring_color: None,
        orbit_ring_width: None,
        is_ring_only: None,
    }
}

/// Звезда: `star_index == 0` главная, иначе компаньон с буквой
pub fn default_star(system_name: &str, star_index: usize) -> CelestialBody {
    let id = naming::star_id(system_name, star_index);
    let mut star = blank(
        id,
        BodyKind::Star {
            star_letter: naming::star_letter(star_index).map(String::from),
            luminosity: 1.0,
        },
        None,
    );
    star.base_size = Some(64.0);
    star.fallback_color = Some("#FFD700".into());
    star
}

/// Планета: орбита 100 + (n - 1) * 80
pub fn default_planet(
    system_name: &str,
    star_id: &str,
    planet_number: u32,
    orbit_angle: f64,
) -> CelestialBody {
    let id = naming::planet_id(system_name, star_id, planet_number);
    let mut planet = blank(
        id,
        BodyKind::Planet { planet_number },
        Some(star_id.to_string()),
    );
    planet.orbit_distance = 100.0 + f64::from(planet_number.saturating_sub(1)) * 80.0;
    planet.orbit_speed = 1.0;
    planet.orbit_angle = orbit_angle;
    planet.base_size = Some(48.0);
    planet.fallback_color = Some("#6366F1".into());
    planet.orbit_ring_color = Some("rgba(100, 116, 139, 0.3)".into());
    planet.orbit_ring_width = Some(1.0);
    planet
}

/// Луна: орбита 30 + i * 10, где i: индекс буквы
pub fn default_moon(planet_id: &str, moon_letter: char, orbit_angle: f64) -> CelestialBody {
    let index = naming::moon_index(moon_letter).unwrap_or(0);
    let mut moon = blank(
        naming::moon_id(planet_id, moon_letter),
        BodyKind::Moon { moon_letter },
        Some(planet_id.to_string()),
    );
    moon.orbit_distance = 30.0 + index as f64 * 10.0;
    moon.orbit_speed = 2.0;
    moon.orbit_angle = orbit_angle;
    moon.scale = 0.5;
    moon.base_size = Some(24.0);
    moon.fallback_color = Some("#94A3B8".into());
    moon.orbit_ring_color = Some("rgba(100, 116, 139, 0.2)".into());
    moon.orbit_ring_width = Some(0.5);
    moon
}

/// Станция: орбита 40 + i * 5
pub fn default_station(
    parent_id: &str,
    station_type: StationType,
    station_index: u32,
    orbit_angle: f64,
) -> CelestialBody {
    let mut station = blank(
        naming::station_id(parent_id, station_type, station_index),
        BodyKind::Station { station_type },
        Some(parent_id.to_string()),
    );
    station.orbit_distance = 40.0 + f64::from(station_index) * 5.0;
    station.orbit_speed = 3.0;
    station.orbit_angle = orbit_angle;
    station.scale = 0.5;
    station.base_size = Some(20.0);
    station.fallback_color = Some("#EAB308".into());
    station.orbit_ring_color = Some("rgba(234, 179, 8, 0.2)".into());
    station.orbit_ring_width = Some(0.5);
    station
}

/// Пояс астероидов: корневое кольцо без диска
pub fn default_asteroid_belt(system_name: &str, belt_index: u32) -> CelestialBody {
    let mut belt = blank(
        naming::asteroid_belt_id(system_name, belt_index),
        BodyKind::Asteroid {
            belt_index: Some(belt_index),
        },
        None,
    );
    belt.orbit_distance = 200.0;
    belt.base_size = Some(0.0);
    belt.fallback_color = Some("rgba(156, 163, 175, 0.15)".into());
    belt.orbit_ring_color = Some("rgba(156, 163, 175, 0.15)".into());
    belt.orbit_ring_width = Some(3.0);
    belt.is_ring_only = Some(true);
    belt
}
