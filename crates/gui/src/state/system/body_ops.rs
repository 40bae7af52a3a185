//! Body CRUD operations

use serde::{Deserialize, Serialize};
use shared::{validation, BodyId, BodyKind, CelestialBody};

use super::{find_in, SystemStore, TreeError};

/// Partial update of a body. `None` leaves the field untouched.
///
/// Empty color strings clear the corresponding override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sprite: Option<String>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub rotation_speed: Option<f64>,
    pub orbit_distance: Option<f64>,
    pub orbit_speed: Option<f64>,
    pub orbit_angle: Option<f64>,
    /// Type payload; the variant must match the existing body
    pub kind: Option<BodyKind>,
    pub base_size: Option<f64>,
    pub fallback_color: Option<String>,
    pub orbit_ring_color: Option<String>,
    pub orbit_ring_width: Option<f64>,
    pub is_ring_only: Option<bool>,
    /// Replacement children; existing children are kept when absent
    pub children: Option<Vec<CelestialBody>>,
}

impl BodyPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, body: &mut CelestialBody) {
        let BodyPatch {
            name,
            description,
            sprite,
            scale,
            rotation,
            rotation_speed,
            orbit_distance,
            orbit_speed,
            orbit_angle,
            kind,
            base_size,
            fallback_color,
            orbit_ring_color,
            orbit_ring_width,
            is_ring_only,
            children,
        } = self;

        if let Some(v) = name {
            body.name = v;
        }
        if let Some(v) = description {
            body.description = v;
        }
        if let Some(v) = sprite {
            body.sprite = v;
        }
        if let Some(v) = scale {
            body.scale = v;
        }
        if let Some(v) = rotation {
            body.rotation = v;
        }
        if let Some(v) = rotation_speed {
            body.rotation_speed = v;
        }
        if let Some(v) = orbit_distance {
            body.orbit_distance = v;
        }
        if let Some(v) = orbit_speed {
            body.orbit_speed = v;
        }
        if let Some(v) = orbit_angle {
            body.orbit_angle = v;
        }
        if let Some(v) = kind {
            body.kind = v;
        }
        if let Some(v) = base_size {
            body.base_size = Some(v);
        }
        if let Some(v) = fallback_color {
            body.fallback_color = non_empty(v);
        }
        if let Some(v) = orbit_ring_color {
            body.orbit_ring_color = non_empty(v);
        }
        if let Some(v) = orbit_ring_width {
            body.orbit_ring_width = Some(v);
        }
        if let Some(v) = is_ring_only {
            body.is_ring_only = Some(v);
        }
        if let Some(v) = children {
            body.children = v;
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

impl SystemStore {
    /// Insert a body (and any children it already carries).
    ///
    /// Roots are appended to the forest, other bodies to their parent's
    /// children. Rejected without mutation when the parent is missing or any
    /// id in the subtree already exists.
    pub fn add_body(&mut self, body: CelestialBody) -> Result<(), TreeError> {
        if !self.has_system() {
            return Err(TreeError::NoSystem);
        }
        check_values(&body)?;
        self.check_new_ids(&body, None)?;

        match body.parent_id.clone() {
            None => self.roots.push(body),
            Some(parent_id) => {
                let parent = self
                    .find_body_mut(&parent_id)
                    .ok_or(TreeError::ParentNotFound(parent_id))?;
                parent.children.push(body);
            }
        }
        self.touch();
        Ok(())
    }

    /// Replace the supplied fields of a body in place.
    ///
    /// The body keeps its id, type, and position among its siblings.
    pub fn update_body(&mut self, id: &str, patch: BodyPatch) -> Result<(), TreeError> {
        let existing = self
            .find_body(id)
            .ok_or_else(|| TreeError::BodyNotFound(id.to_string()))?;

        if let Some(kind) = &patch.kind {
            if kind.body_type() != existing.body_type() {
                return Err(TreeError::KindMismatch {
                    id: id.to_string(),
                    from: existing.body_type(),
                    to: kind.body_type(),
                });
            }
        }

        let mut updated = existing.clone();
        patch.apply(&mut updated);
        self.commit(id, updated)
    }

    /// Replace a whole body record, keeping its placement.
    ///
    /// Existing children are kept when `body.children` is empty.
    pub fn replace_body(&mut self, mut body: CelestialBody) -> Result<(), TreeError> {
        let existing = self
            .find_body(&body.id)
            .ok_or_else(|| TreeError::BodyNotFound(body.id.clone()))?;
        if existing.parent_id != body.parent_id {
            return Err(TreeError::ParentMismatch {
                id: body.id.clone(),
                expected: existing.parent_id.clone(),
                actual: body.parent_id.clone(),
            });
        }
        if existing.body_type() != body.body_type() {
            return Err(TreeError::KindMismatch {
                id: body.id.clone(),
                from: existing.body_type(),
                to: body.body_type(),
            });
        }
        if body.children.is_empty() {
            body.children = existing.children.clone();
        }
        body.fallback_color = body.fallback_color.and_then(non_empty);
        body.orbit_ring_color = body.orbit_ring_color.and_then(non_empty);
        let id = body.id.clone();
        self.commit(&id, body)
    }

    /// Validate an updated record and write it over the body with `id`
    fn commit(&mut self, id: &str, updated: CelestialBody) -> Result<(), TreeError> {
        check_values(&updated)?;
        self.check_new_ids(&updated, Some(id))?;
        self.check_sibling_numbers(&updated)?;

        if let Some(body) = self.find_body_mut(id) {
            *body = updated;
        }
        self.touch();
        Ok(())
    }

    /// Remove a body and its whole subtree.
    ///
    /// Returns every removed id so callers can drop selection and focus
    /// references to them.
    pub fn remove_body(&mut self, id: &str) -> Result<Vec<BodyId>, TreeError> {
        let removed = remove_in(&mut self.roots, id)
            .ok_or_else(|| TreeError::BodyNotFound(id.to_string()))?;
        self.touch();
        Ok(removed.subtree_ids())
    }

    /// Every id in `body`'s subtree must be new. `replacing` names a body
    /// whose own id may repeat (the body being updated).
    fn check_new_ids(
        &self,
        body: &CelestialBody,
        replacing: Option<&str>,
    ) -> Result<(), TreeError> {
        validation::validate_body(body).map_err(|e| {
            match e.issues.into_iter().next() {
                Some(validation::Issue::DuplicateId(dup)) => TreeError::DuplicateId(dup),
                Some(validation::Issue::ParentMismatch {
                    id,
                    expected,
                    actual,
                }) => TreeError::ParentMismatch {
                    id,
                    expected: Some(expected),
                    actual,
                },
                Some(issue) => TreeError::InvalidValue {
                    id: body.id.clone(),
                    reason: issue.to_string(),
                },
                None => TreeError::InvalidValue {
                    id: body.id.clone(),
                    reason: "invalid body".into(),
                },
            }
        })?;

        for id in body.subtree_ids() {
            if replacing == Some(id.as_str()) {
                continue;
            }
            if let Some(existing) = self.find_body(&id) {
                // a replaced subtree may reuse ids of the children it drops
                let inside_replaced = replacing
                    .and_then(|r| self.find_body(r))
                    .is_some_and(|r| find_in(&r.children, &existing.id).is_some());
                if !inside_replaced {
                    return Err(TreeError::DuplicateId(id));
                }
            }
        }
        Ok(())
    }

    /// Planet numbers and moon letters stay unique among siblings
    fn check_sibling_numbers(&self, updated: &CelestialBody) -> Result<(), TreeError> {
        let siblings: &[CelestialBody] = match updated.parent_id.as_deref() {
            None => &self.roots,
            Some(parent) => match self.find_body(parent) {
                Some(p) => &p.children,
                None => return Ok(()),
            },
        };
        let clash = siblings.iter().filter(|s| s.id != updated.id).any(|s| {
            match (&s.kind, &updated.kind) {
                (BodyKind::Planet { planet_number: a }, BodyKind::Planet { planet_number: b }) => {
                    a == b
                }
                (BodyKind::Moon { moon_letter: a }, BodyKind::Moon { moon_letter: b }) => a == b,
                _ => false,
            }
        });
        if clash {
            return Err(TreeError::InvalidValue {
                id: updated.id.clone(),
                reason: "planet number or moon letter already used by a sibling".into(),
            });
        }
        Ok(())
    }
}

/// Range checks on the body's own fields
fn check_values(body: &CelestialBody) -> Result<(), TreeError> {
    let invalid = |reason: &str| TreeError::InvalidValue {
        id: body.id.clone(),
        reason: reason.to_string(),
    };
    if body.id.is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if !(body.scale > 0.0) || !body.scale.is_finite() {
        return Err(invalid("scale must be positive"));
    }
    if !(body.orbit_distance >= 0.0) || !body.orbit_distance.is_finite() {
        return Err(invalid("orbit distance must be non-negative"));
    }
    let finite = [
        body.orbit_speed,
        body.orbit_angle,
        body.rotation,
        body.rotation_speed,
    ];
    if finite.iter().any(|v| !v.is_finite()) {
        return Err(invalid("numbers must be finite"));
    }
    if body.description.chars().count() > shared::MAX_DESCRIPTION_LEN {
        return Err(invalid("description is too long"));
    }
    Ok(())
}

fn remove_in(bodies: &mut Vec<CelestialBody>, id: &str) -> Option<CelestialBody> {
    if let Some(pos) = bodies.iter().position(|b| b.id == id) {
        return Some(bodies.remove(pos));
    }
    bodies
        .iter_mut()
        .find_map(|body| remove_in(&mut body.children, id))
}
