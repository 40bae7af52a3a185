//! Plain JSON documents

use std::path::Path;

use shared::validation::validate_file;
use shared::{naming, SystemFile};

use super::PersistenceError;

/// Parse and validate a system document
pub fn from_json_str(json: &str) -> Result<SystemFile, PersistenceError> {
    let file: SystemFile = serde_json::from_str(json)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn to_json_string(file: &SystemFile) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(file)?)
}

pub fn read_system_file(path: &Path) -> Result<SystemFile, PersistenceError> {
    let json = std::fs::read_to_string(path)?;
    from_json_str(&json)
}

pub fn write_system_file(path: &Path, file: &SystemFile) -> Result<(), PersistenceError> {
    std::fs::write(path, to_json_string(file)?)?;
    tracing::info!("Saved '{}' to {}", file.system.name, path.display());
    Ok(())
}

/// Default file name for a system, e.g. `alpha-centauri.json`
pub fn suggested_filename(file: &SystemFile, extension: &str) -> String {
    format!("{}.{}", naming::file_stem(&file.system.name), extension)
}
