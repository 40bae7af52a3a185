//! Display helper functions for bodies

use shared::{BodyKind, BodyType, CelestialBody};

/// Get display name for a body (name, plus id when they differ)
pub fn body_display_name(body: &CelestialBody) -> String {
    if body.name == body.id || body.name.is_empty() {
        body.id.clone()
    } else {
        format!("{} ({})", body.name, body.id)
    }
}

/// Short type label
pub fn type_label(body_type: BodyType) -> &'static str {
    match body_type {
        BodyType::Star => "Star",
        BodyType::Planet => "Planet",
        BodyType::Moon => "Moon",
        BodyType::Station => "Station",
        BodyType::Asteroid => "Asteroid Belt",
    }
}

/// Get icon for a body
pub fn body_icon(body: &CelestialBody) -> &'static str {
    match body.body_type() {
        BodyType::Star => "[*]",
        BodyType::Planet => "[o]",
        BodyType::Moon => "[.]",
        BodyType::Station => "[#]",
        BodyType::Asteroid => "[:]",
    }
}

/// Secondary tree label, e.g. "Planet 3" or "Mining station"
pub fn body_sublabel(body: &CelestialBody) -> String {
    match &body.kind {
        BodyKind::Star {
            star_letter: Some(letter),
            ..
        } => format!("Companion star {}", letter),
        BodyKind::Star { .. } => "Primary star".to_string(),
        BodyKind::Planet { planet_number } => format!("Planet {}", planet_number),
        BodyKind::Moon { moon_letter } => format!("Moon {}", moon_letter),
        BodyKind::Station { station_type } => format!("{} station", station_type.label()),
        BodyKind::Asteroid { belt_index } => match belt_index {
            Some(i) => format!("Belt {}", i),
            None => "Asteroid belt".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::defaults::{default_planet, default_star};

    #[test]
    fn test_display_name() {
        let mut planet = default_planet("Sol", "Sol", 3, 0.0);
        assert_eq!(body_display_name(&planet), "Sol 3");
        planet.name = "Earth".into();
        assert_eq!(body_display_name(&planet), "Earth (Sol 3)");
    }

    #[test]
    fn test_sublabels() {
        assert_eq!(body_sublabel(&default_star("Sol", 0)), "Primary star");
        assert_eq!(body_sublabel(&default_star("Sol", 1)), "Companion star A");
        assert_eq!(body_sublabel(&default_planet("Sol", "Sol", 2, 0.0)), "Planet 2");
    }
}
