//! Autosave/recovery of the working system

use shared::SystemFile;

use super::SystemStore;

impl SystemStore {
    /// Get autosave file path
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "starforge", "starforge")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Write the current system to the autosave file (ignored when empty)
    pub fn autosave(&self) {
        let (Some(path), Some(file)) = (Self::autosave_path(), self.to_file()) else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Autosave failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("Autosave serialization failed: {}", e),
        }
    }

    /// Read the autosave file. Unreadable or invalid files yield `None`.
    pub fn load_autosave() -> Option<SystemFile> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        let file: SystemFile = serde_json::from_str(&json).ok()?;
        shared::validation::validate_file(&file).ok()?;
        Some(file)
    }

    /// Check if autosave file exists
    pub fn has_autosave() -> bool {
        Self::autosave_path().map(|p| p.exists()).unwrap_or(false)
    }
}
