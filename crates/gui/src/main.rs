mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::tasks`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use starforge_gui_lib::command;
pub use starforge_gui_lib::fixtures;
pub use starforge_gui_lib::helpers;
pub use starforge_gui_lib::persistence;
pub use starforge_gui_lib::sprites;
pub use starforge_gui_lib::state;
pub use starforge_gui_lib::tasks;

use std::path::{Path, PathBuf};

use app::StarforgeApp;
use shared::SystemFile;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starforge=info,starforge_gui_lib=info".into()),
        )
        .init();

    let args = parse_args();

    // Headless: run a command script and print the responses
    if let Some(script) = args.script {
        std::process::exit(run_script(&script, args.system));
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Starforge: Solar System Designer")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let initial = args.system;
    if let Err(e) = eframe::run_native(
        "starforge",
        native_options,
        Box::new(move |cc| Ok(Box::new(StarforgeApp::new(cc, initial)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

#[derive(Default)]
struct Args {
    system: Option<SystemFile>,
    script: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut parsed = Args::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--system" => {
                if let Some(path) = args.next() {
                    parsed.system = read_system_arg(&path);
                }
            }
            "--script" => parsed.script = args.next().map(PathBuf::from),
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
    }
    parsed
}

fn read_system_arg(path: &str) -> Option<SystemFile> {
    let path = PathBuf::from(path);
    let result = if path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
    {
        persistence::bundle::read_bundle_file(&path).map(|b| b.file)
    } else {
        persistence::json::read_system_file(&path)
    };
    match result {
        Ok(file) => {
            tracing::info!("Loaded system from {} ({} roots)", path.display(), file.root_bodies.len());
            Some(file)
        }
        Err(e) => {
            tracing::error!("Failed to load system from {}: {e}", path.display());
            None
        }
    }
}

/// Execute a JSON array of commands. Returns the process exit code.
fn run_script(path: &Path, system: Option<SystemFile>) -> i32 {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to read script {}: {e}", path.display());
            return 2;
        }
    };

    let mut harness = starforge_gui_lib::harness::TestHarness::new();
    if let Some(file) = system {
        if let Err(e) = harness.load_file(file) {
            tracing::error!("Initial system rejected: {e}");
            return 2;
        }
    }

    match command::execute_json_batch(&mut harness, &text) {
        Ok(responses) => {
            let failed = responses.iter().filter(|r| !r.success).count();
            match serde_json::to_string_pretty(&responses) {
                Ok(out) => println!("{out}"),
                Err(e) => tracing::error!("Failed to serialize responses: {e}"),
            }
            if failed > 0 {
                1
            } else {
                0
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            2
        }
    }
}
