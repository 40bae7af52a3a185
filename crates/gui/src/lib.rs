// Library crate: exposes testable modules for integration tests and the command protocol.
// Window-specific modules (app, ui, viewport painting) remain in the binary crate.

pub mod animator;
pub mod command;
pub mod fixtures;
pub mod harness;
pub mod helpers;
pub mod persistence;
pub mod sprites;
pub mod state;
pub mod tasks;

/// Frame building, hit testing and input mapping. Painting the frame with egui
/// stays in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod frame;
    pub mod interaction;
    pub mod picking;
    pub mod visuals;
}
