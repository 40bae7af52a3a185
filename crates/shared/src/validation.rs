//! Проверка загружаемых систем.
//!
//! Система принимается целиком или отклоняется со списком всех нарушений.

use std::collections::HashSet;

use thiserror::Error;

use crate::{BodyKind, BodyType, CelestialBody, SolarSystem, SystemFile, MAX_DESCRIPTION_LEN};

/// Одно нарушение инварианта
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Issue {
    #[error("system has no root star")]
    NoRootStar,
    #[error("system bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },
    #[error("body id must not be empty")]
    EmptyId,
    #[error("duplicate body id '{0}'")]
    DuplicateId(String),
    #[error("root body '{id}' has parentId '{parent}'")]
    RootWithParent { id: String, parent: String },
    #[error("body '{id}' is a child of '{expected}' but has parentId {actual:?}")]
    ParentMismatch {
        id: String,
        expected: String,
        actual: Option<String>,
    },
    #[error("body '{id}': {field} must be {rule}, got {value}")]
    OutOfRange {
        id: String,
        field: &'static str,
        rule: &'static str,
        value: f64,
    },
    #[error("body '{id}': description longer than 500 characters")]
    DescriptionTooLong { id: String },
    #[error("body '{id}': moonLetter '{letter}' must be a lowercase letter")]
    InvalidMoonLetter { id: String, letter: char },
    #[error("body '{parent}' has two {kind} children numbered '{value}'")]
    DuplicateSibling {
        parent: String,
        kind: BodyType,
        value: String,
    },
}

/// Ошибка валидации: все найденные нарушения
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid system data: {}", summary(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

fn summary(issues: &[Issue]) -> String {
    const SHOWN: usize = 3;
    let mut parts: Vec<String> = issues.iter().take(SHOWN).map(|i| i.to_string()).collect();
    if issues.len() > SHOWN {
        parts.push(format!("and {} more", issues.len() - SHOWN));
    }
    parts.join("; ")
}

/// Проверить документ системы целиком
pub fn validate_file(file: &SystemFile) -> Result<(), ValidationError> {
    validate_system(&file.system, &file.root_bodies)
}

/// Проверить метаданные и лес тел
pub fn validate_system(
    system: &SolarSystem,
    roots: &[CelestialBody],
) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    let b = system.bounds;
    if !(b.width > 0.0 && b.height > 0.0) || !b.width.is_finite() || !b.height.is_finite() {
        issues.push(Issue::InvalidBounds {
            width: b.width,
            height: b.height,
        });
    }

    if !roots.iter().any(|r| r.body_type() == BodyType::Star) {
        issues.push(Issue::NoRootStar);
    }

    let mut seen = HashSet::new();
    for root in roots {
        if let Some(parent) = &root.parent_id {
            issues.push(Issue::RootWithParent {
                id: root.id.clone(),
                parent: parent.clone(),
            });
        }
        check_body(root, &mut seen, &mut issues);
    }
    check_siblings("<root>", roots, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

/// Проверить одно тело и его поддерево (без проверки родителя корня)
pub fn validate_body(body: &CelestialBody) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    check_body(body, &mut HashSet::new(), &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn check_body<'a>(body: &'a CelestialBody, seen: &mut HashSet<&'a str>, issues: &mut Vec<Issue>) {
    if body.id.is_empty() {
        issues.push(Issue::EmptyId);
    } else if !seen.insert(body.id.as_str()) {
        issues.push(Issue::DuplicateId(body.id.clone()));
    }

    let mut range = |field: &'static str, rule: &'static str, value: f64, ok: bool| {
        if !ok || !value.is_finite() {
            issues.push(Issue::OutOfRange {
                id: body.id.clone(),
                field,
                rule,
                value,
            });
        }
    };
    range("scale", "positive", body.scale, body.scale > 0.0);
    range("orbitDistance", "non-negative", body.orbit_distance, body.orbit_distance >= 0.0);
    range("orbitSpeed", "finite", body.orbit_speed, true);
    range("orbitAngle", "finite", body.orbit_angle, true);
    range("rotation", "finite", body.rotation, true);
    range("rotationSpeed", "finite", body.rotation_speed, true);
    if let Some(size) = body.base_size {
        range("baseSize", "non-negative", size, size >= 0.0);
    }
    if let Some(width) = body.orbit_ring_width {
        range("orbitRingWidth", "non-negative", width, width >= 0.0);
    }
    match &body.kind {
        BodyKind::Star { luminosity, .. } => {
            range("luminosity", "positive", *luminosity, *luminosity > 0.0)
        }
        BodyKind::Planet { planet_number } => {
            let n = f64::from(*planet_number);
            range("planetNumber", "positive", n, *planet_number > 0)
        }
        BodyKind::Asteroid {
            belt_index: Some(index),
        } => range("beltIndex", "positive", f64::from(*index), *index > 0),
        BodyKind::Moon { moon_letter } if !moon_letter.is_ascii_lowercase() => {
            issues.push(Issue::InvalidMoonLetter {
                id: body.id.clone(),
                letter: *moon_letter,
            })
        }
        _ => {}
    }

    if body.description.chars().count() > MAX_DESCRIPTION_LEN {
        issues.push(Issue::DescriptionTooLong {
            id: body.id.clone(),
        });
    }

    for child in &body.children {
        if child.parent_id.as_deref() != Some(body.id.as_str()) {
            issues.push(Issue::ParentMismatch {
                id: child.id.clone(),
                expected: body.id.clone(),
                actual: child.parent_id.clone(),
            });
        }
        check_body(child, seen, issues);
    }
    check_siblings(&body.id, &body.children, issues);
}

fn check_siblings(parent: &str, siblings: &[CelestialBody], issues: &mut Vec<Issue>) {
    let mut planets = HashSet::new();
    let mut moons = HashSet::new();
    for s in siblings {
        match s.kind {
            BodyKind::Planet { planet_number } if !planets.insert(planet_number) => {
                issues.push(Issue::DuplicateSibling {
                    parent: parent.to_string(),
                    kind: BodyType::Planet,
                    value: planet_number.to_string(),
                })
            }
            BodyKind::Moon { moon_letter } if !moons.insert(moon_letter) => {
                issues.push(Issue::DuplicateSibling {
                    parent: parent.to_string(),
                    kind: BodyType::Moon,
                    value: moon_letter.to_string(),
                })
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{default_asteroid_belt, default_moon, default_planet, default_star};
    use crate::Bounds;

    fn system() -> SolarSystem {
        SolarSystem {
            id: "sys".into(),
            name: "Sol".into(),
            bounds: Bounds::default(),
        }
    }

    fn sol() -> Vec<CelestialBody> {
        let mut star = default_star("Sol", 0);
        let mut earth = default_planet("Sol", "Sol", 1, 0.0);
        earth.children.push(default_moon("Sol 1", 'a', 0.0));
        star.children.push(earth);
        vec![star, default_asteroid_belt("Sol", 1)]
    }

    #[test]
    fn test_valid_system_passes() {
        assert_eq!(validate_system(&system(), &sol()), Ok(()));
    }

    #[test]
    fn test_requires_root_star() {
        let err = validate_system(&system(), &[default_asteroid_belt("Sol", 1)]).unwrap_err();
        assert!(err.issues.contains(&Issue::NoRootStar));
    }

    #[test]
    fn test_empty_forest_rejected() {
        let err = validate_system(&system(), &[]).unwrap_err();
        assert_eq!(err.issues, vec![Issue::NoRootStar]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut roots = sol();
        roots[0].children.push(default_planet("Sol", "Sol", 1, 0.0));
        let err = validate_system(&system(), &roots).unwrap_err();
        assert!(err.issues.contains(&Issue::DuplicateId("Sol 1".into())));
    }

    #[test]
    fn test_parent_mismatch_rejected() {
        let mut roots = sol();
        roots[0].children[0].children[0].parent_id = Some("Sol".into());
        let err = validate_system(&system(), &roots).unwrap_err();
        assert!(matches!(err.issues[0], Issue::ParentMismatch { .. }));
    }

    #[test]
    fn test_negative_distance_and_zero_scale() {
        let mut roots = sol();
        roots[0].children[0].orbit_distance = -1.0;
        roots[0].children[0].scale = 0.0;
        let err = validate_system(&system(), &roots).unwrap_err();
        assert_eq!(err.issues.len(), 2);
    }

    #[test]
    fn test_nan_rejected() {
        let mut roots = sol();
        roots[0].children[0].orbit_angle = f64::NAN;
        assert!(validate_system(&system(), &roots).is_err());
    }

    #[test]
    fn test_invalid_bounds() {
        let mut sys = system();
        sys.bounds.width = 0.0;
        let err = validate_system(&sys, &sol()).unwrap_err();
        assert!(matches!(err.issues[0], Issue::InvalidBounds { .. }));
    }

    #[test]
    fn test_description_limit() {
        let mut roots = sol();
        roots[0].description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_system(&system(), &roots).is_err());
        roots[0].description = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_system(&system(), &roots).is_ok());
    }

    #[test]
    fn test_duplicate_planet_numbers() {
        let mut roots = sol();
        let mut twin = default_planet("Sol", "Sol", 1, 0.0);
        twin.id = "Twin".into();
        roots[0].children.push(twin);
        let err = validate_system(&system(), &roots).unwrap_err();
        assert!(matches!(
            err.issues[0],
            Issue::DuplicateSibling {
                kind: BodyType::Planet,
                ..
            }
        ));
    }

    #[test]
    fn test_error_message_lists_issues() {
        let err = validate_system(&system(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "invalid system data: system has no root star");
    }
}
