//! Common helpers shared by the hierarchy, property panel and menus

use shared::{BodyId, BodyType, CelestialBody, StationType};

use crate::state::{AppState, TreeError};

/// Currently selected body, if it still exists
pub fn selected_body(state: &AppState) -> Option<&CelestialBody> {
    state
        .view
        .selected_id()
        .and_then(|id| state.system.find_body(id))
}

/// Child-creating actions offered for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddAction {
    Planet,
    Moon,
    Station(StationType),
}

/// What can be added under a body of the given type
pub fn add_actions_for(body_type: BodyType) -> Vec<AddAction> {
    let stations = StationType::ALL.into_iter().map(AddAction::Station);
    match body_type {
        BodyType::Star => vec![AddAction::Planet],
        BodyType::Planet => std::iter::once(AddAction::Moon).chain(stations).collect(),
        BodyType::Moon => stations.collect(),
        BodyType::Station | BodyType::Asteroid => Vec::new(),
    }
}

/// Run an add action under `parent_id` and select the new body
pub fn perform_add(
    state: &mut AppState,
    parent_id: &str,
    action: AddAction,
) -> Result<BodyId, TreeError> {
    let id = match action {
        AddAction::Planet => state.system.add_planet(parent_id)?,
        AddAction::Moon => state.system.add_moon(parent_id)?,
        AddAction::Station(t) => state.system.add_station(parent_id, t)?,
    };
    state.select_id(Some(&id));
    Ok(id)
}

/// Stars can only go while another star remains
pub fn can_delete(state: &AppState, body: &CelestialBody) -> bool {
    body.body_type() != BodyType::Star || state.system.star_count() > 1
}

/// Evaluate a numeric property field. Accepts plain numbers and arithmetic
/// such as `100 + 80 * 2` or `PI / 4`.
pub fn parse_number_field(text: &str) -> Result<f64, String> {
    shared::expr::eval_number(text).map_err(|e| e.to_string())
}

/// Shortest decimal text for a field value
pub fn format_number(value: f64) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::{AppSettings, SystemStore};

    fn sol_state() -> AppState {
        let mut s = AppState::with_settings(AppSettings::default(), SystemStore::with_seed(5));
        s.load_file(fixtures::sol_system()).unwrap();
        s
    }

    #[test]
    fn test_add_actions() {
        assert_eq!(add_actions_for(BodyType::Star), vec![AddAction::Planet]);
        assert_eq!(add_actions_for(BodyType::Planet).len(), 6);
        assert_eq!(add_actions_for(BodyType::Moon).len(), 5);
        assert!(add_actions_for(BodyType::Asteroid).is_empty());
        assert_eq!(
            add_actions_for(BodyType::Moon)[1],
            AddAction::Station(StationType::Mining)
        );
    }

    #[test]
    fn test_perform_add_selects_new_body() {
        let mut s = sol_state();
        let id = perform_add(&mut s, "Sol", AddAction::Planet).unwrap();
        assert_eq!(id, "Sol 9");
        assert_eq!(s.view.selected_id(), Some("Sol 9"));
        assert_eq!(selected_body(&s).map(|b| b.id.as_str()), Some("Sol 9"));
    }

    #[test]
    fn test_star_deletion_needs_companion() {
        let mut s = sol_state();
        let sun = s.system.find_body("Sol").unwrap().clone();
        assert!(!can_delete(&s, &sun));
        s.system.add_companion_star().unwrap();
        assert!(can_delete(&s, &sun));
        let earth = s.system.find_body("Sol 3").unwrap();
        assert!(can_delete(&s, earth));
    }

    #[test]
    fn test_number_fields() {
        assert_eq!(parse_number_field("42.5"), Ok(42.5));
        assert_eq!(parse_number_field("100 + 80 * 2"), Ok(260.0));
        assert!(parse_number_field("earth").is_err());
        assert_eq!(format_number(260.0), "260");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(-0.00001), "0");
    }
}
