//! JSON command protocol for scripted and agent-driven editing.
//!
//! Every command runs against a [`TestHarness`], so a script behaves exactly
//! like the same clicks in the window.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use shared::{CelestialBody, StationType};

use crate::harness::TestHarness;
use crate::state::{body_display_name, BodyPatch};

/// A command the agent can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Start a new system with a single root star
    NewSystem { name: String },
    /// Load the built-in Sol template
    LoadTemplate,
    /// Load a system document given as JSON text
    Load { json: String },
    /// Add a planet under a star
    AddPlanet { star_id: String },
    /// Add a moon under a planet
    AddMoon { planet_id: String },
    /// Add a station under a planet or moon
    AddStation {
        parent_id: String,
        #[serde(default = "default_station_type")]
        station_type: StationType,
    },
    /// Add a root asteroid belt
    AddBelt,
    /// Add a companion root star
    AddStar,
    /// Update fields of a body
    Update { id: String, patch: BodyPatch },
    /// Remove a body and its subtree
    Remove { id: String },
    /// Select a body; `null` clears
    Select { id: Option<String> },
    /// Follow a body with the camera; `null` stops following
    Focus { id: Option<String> },
    /// Set the user zoom (clamped)
    Zoom { zoom: f64 },
    /// Toggle orbit rings
    ShowOrbits { on: bool },
    /// Start or stop the orbit animation
    Animate { on: bool },
    /// Advance the manual clock
    Tick { seconds: f64 },
    /// Click at a viewport position
    Click {
        x: f64,
        y: f64,
        #[serde(default)]
        double: bool,
    },
    /// Inspect the system: list all bodies
    Inspect,
    /// Render one frame and summarize it
    Render,
    /// Export the system as JSON
    Export,
}

fn default_station_type() -> StationType {
    StationType::Research
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn created<E: std::fmt::Display>(result: Result<String, E>) -> CommandResponse {
    match result {
        Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

fn describe(body: &CelestialBody) -> serde_json::Value {
    serde_json::json!({
        "id": body.id,
        "name": body_display_name(body),
        "type": body.body_type(),
        "parentId": body.parent_id,
        "orbitDistance": body.orbit_distance,
        "children": body.children.iter().map(describe).collect::<Vec<_>>(),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::NewSystem { name } => {
            if name.trim().is_empty() {
                return CommandResponse::err("System name must not be empty");
            }
            harness.new_system(name.trim());
            CommandResponse::ok_with_data(serde_json::json!({ "star": name.trim() }))
        }

        AgentCommand::LoadTemplate => {
            harness.load_sol();
            CommandResponse::ok_with_data(serde_json::json!({ "body_count": harness.body_count() }))
        }

        AgentCommand::Load { json } => match harness.load_json(&json) {
            Ok(()) => CommandResponse::ok_with_data(
                serde_json::json!({ "body_count": harness.body_count() }),
            ),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::AddPlanet { star_id } => created(harness.add_planet(&star_id)),
        AgentCommand::AddMoon { planet_id } => created(harness.add_moon(&planet_id)),
        AgentCommand::AddStation {
            parent_id,
            station_type,
        } => created(harness.add_station(&parent_id, station_type)),
        AgentCommand::AddBelt => created(harness.add_belt()),
        AgentCommand::AddStar => created(harness.add_star()),

        AgentCommand::Update { id, patch } => match harness.update(&id, patch) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Remove { id } => match harness.remove(&id) {
            Ok(removed) => CommandResponse::ok_with_data(serde_json::json!({ "removed": removed })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Select { id } => {
            let found = harness.select(id.as_deref());
            if id.is_some() && !found {
                return CommandResponse::err(format!("Body '{}' not found", id.unwrap_or_default()));
            }
            CommandResponse::ok_with_data(serde_json::json!({ "selected": id }))
        }

        AgentCommand::Focus { id } => {
            let found = harness.focus(id.as_deref());
            if id.is_some() && !found {
                return CommandResponse::err(format!("Body '{}' not found", id.unwrap_or_default()));
            }
            CommandResponse::ok_with_data(serde_json::json!({ "focus": id }))
        }

        AgentCommand::Zoom { zoom } => {
            harness.set_zoom(zoom);
            CommandResponse::ok_with_data(
                serde_json::json!({ "zoom": harness.state.view.camera_zoom() }),
            )
        }

        AgentCommand::ShowOrbits { on } => {
            harness.state.view.show_orbits = on;
            CommandResponse::ok()
        }

        AgentCommand::Animate { on } => {
            harness.set_animating(on);
            CommandResponse::ok()
        }

        AgentCommand::Tick { seconds } => {
            if !seconds.is_finite() || seconds < 0.0 {
                return CommandResponse::err("Tick seconds must be a non-negative number");
            }
            // walk the clock in animator-sized steps so every gate opens
            let step = harness.state.animator.tick_interval().max(0.001);
            let mut left = seconds;
            while left > 0.0 {
                let dt = left.min(step);
                harness.tick(dt);
                left -= dt;
            }
            CommandResponse::ok_with_data(serde_json::json!({ "clock": harness.clock() }))
        }

        AgentCommand::Click { x, y, double } => {
            let pos = DVec2::new(x, y);
            harness.render();
            if double {
                harness.double_click(pos);
            } else {
                harness.click(pos);
            }
            CommandResponse::ok_with_data(serde_json::json!({
                "selected": harness.state.view.selected_id(),
                "focus": harness.state.view.focus_target().map(|t| t.id.clone()),
            }))
        }

        AgentCommand::Inspect => {
            let system = harness.state.system.system().cloned();
            let bodies: Vec<serde_json::Value> =
                harness.state.system.roots().iter().map(describe).collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "system": system,
                "body_count": harness.body_count(),
                "dirty": harness.state.system.is_dirty(),
                "selected": harness.state.view.selected_id(),
                "bodies": bodies,
            }))
        }

        AgentCommand::Render => {
            let frame = harness.render();
            CommandResponse::ok_with_data(serde_json::json!({
                "placeholder": frame.is_placeholder(),
                "zoom": frame.zoom,
                "commands": frame.commands.len(),
                "hit_regions": frame.hits.len(),
            }))
        }

        AgentCommand::Export => match harness.export_json() {
            Some(json) => CommandResponse::ok_with_data(serde_json::json!({ "system_json": json })),
            None => CommandResponse::err("No system loaded"),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
