//! File storage behind the REST routes: system documents and sprite images

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use shared::naming::file_stem;
use shared::validation::{validate_file, ValidationError};
use shared::{SystemEntry, SystemFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Only {0} files are allowed")]
    BadExtension(&'static str),
    #[error("Invalid file name")]
    BadFilename,
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid system data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Storage failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn status(&self) -> StatusCode {
        match self {
            StorageError::BadExtension(_)
            | StorageError::BadFilename
            | StorageError::Parse(_)
            | StorageError::Invalid(_) => StatusCode::BAD_REQUEST,
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
            StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Reduce a client-supplied name to its final path component and require
/// the given extension (case-insensitive).
pub fn sanitize_filename(raw: &str, extension: &'static str) -> Result<String, StorageError> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    if base.is_empty() || base == "." || base == ".." {
        return Err(StorageError::BadFilename);
    }
    let has_extension = Path::new(base)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if !has_extension {
        return Err(StorageError::BadExtension(extension));
    }
    Ok(base.to_string())
}

/// Filename a system is stored under: its name slugged, plus `.json`
pub fn system_filename(system_name: &str) -> String {
    format!("{}.json", file_stem(system_name))
}

#[derive(Debug, Clone)]
pub struct Storage {
    systems_dir: PathBuf,
    sprite_dir: PathBuf,
}

impl Storage {
    pub fn new(systems_dir: impl Into<PathBuf>, sprite_dir: impl Into<PathBuf>) -> Self {
        Self {
            systems_dir: systems_dir.into(),
            sprite_dir: sprite_dir.into(),
        }
    }

    // ── Systems ─────────────────────────────────────

    pub fn list_systems(&self) -> Result<Vec<SystemEntry>, StorageError> {
        std::fs::create_dir_all(&self.systems_dir)?;
        let mut systems: Vec<SystemEntry> = list_with_extension(&self.systems_dir, "json")?
            .into_iter()
            .map(|filename| SystemEntry {
                name: filename[..filename.len() - ".json".len()].to_string(),
                filename,
            })
            .collect();
        systems.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(systems)
    }

    /// Validate and write a system document. Returns the filename used.
    pub fn save_system(&self, body: serde_json::Value) -> Result<String, StorageError> {
        let file: SystemFile = serde_json::from_value(body)?;
        validate_file(&file)?;
        let filename = sanitize_filename(&system_filename(&file.system.name), "json")?;
        std::fs::create_dir_all(&self.systems_dir)?;
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(self.systems_dir.join(&filename), json)?;
        tracing::info!("Saved system '{}' as {}", file.system.name, filename);
        Ok(filename)
    }

    pub fn read_system(&self, filename: &str) -> Result<SystemFile, StorageError> {
        let filename = sanitize_filename(filename, "json")?;
        let text = read_existing(&self.systems_dir.join(&filename), "System")
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())?;
        let file: SystemFile = serde_json::from_str(&text)?;
        validate_file(&file)?;
        Ok(file)
    }

    pub fn delete_system(&self, filename: &str) -> Result<(), StorageError> {
        let filename = sanitize_filename(filename, "json")?;
        let path = self.systems_dir.join(&filename);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Deleted system {}", filename);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound("System".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Sprites ─────────────────────────────────────

    pub fn list_sprites(&self) -> Result<Vec<String>, StorageError> {
        let mut sprites = list_with_extension(&self.sprite_dir, "png")?;
        sprites.sort();
        Ok(sprites)
    }

    pub fn read_sprite(&self, filename: &str) -> Result<Vec<u8>, StorageError> {
        let filename = sanitize_filename(filename, "png")?;
        read_existing(&self.sprite_dir.join(filename), "Sprite")
    }
}

fn list_with_extension(dir: &Path, extension: &str) -> Result<Vec<String>, StorageError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let matches = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            names.push(name);
        }
    }
    Ok(names)
}

fn read_existing(path: &Path, what: &str) -> Result<Vec<u8>, StorageError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StorageError::NotFound(what.to_string()),
        _ => StorageError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("systems"), dir.path().join("sprites"));
        std::fs::create_dir_all(dir.path().join("sprites")).unwrap();
        (dir, storage)
    }

    fn document(name: &str) -> serde_json::Value {
        json!({
            "formatVersion": "1.0",
            "system": { "id": name, "name": name },
            "rootBodies": [{
                "id": name,
                "name": name,
                "description": "",
                "sprite": "",
                "scale": 1.0,
                "rotation": 0.0,
                "rotationSpeed": 0.0,
                "orbitDistance": 0.0,
                "orbitSpeed": 0.0,
                "orbitAngle": 0.0,
                "type": "star",
                "starLetter": "A",
                "luminosity": 1.0,
                "children": []
            }]
        })
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("sol.json", "json").unwrap(), "sol.json");
        assert_eq!(sanitize_filename("../../etc/sol.JSON", "json").unwrap(), "sol.JSON");
        assert_eq!(sanitize_filename("..\\sun.png", "png").unwrap(), "sun.png");
        assert!(matches!(
            sanitize_filename("../etc/passwd", "json"),
            Err(StorageError::BadExtension("json"))
        ));
        assert!(matches!(sanitize_filename("dir/", "json"), Err(StorageError::BadFilename)));
        assert!(matches!(sanitize_filename("..", "json"), Err(StorageError::BadFilename)));
    }

    #[test]
    fn test_system_filename_slug() {
        assert_eq!(system_filename("Alpha Centauri"), "alpha-centauri.json");
        assert_eq!(system_filename("  Sol  "), "sol.json");
    }

    #[test]
    fn test_save_list_read_delete() {
        let (_dir, storage) = storage();
        assert!(storage.list_systems().unwrap().is_empty());

        let filename = storage.save_system(document("Sol")).unwrap();
        assert_eq!(filename, "sol.json");

        let list = storage.list_systems().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "sol");

        let file = storage.read_system("sol.json").unwrap();
        assert_eq!(file.system.name, "Sol");
        assert_eq!(file.root_bodies.len(), 1);

        storage.delete_system("sol.json").unwrap();
        assert!(storage.list_systems().unwrap().is_empty());
        assert!(matches!(
            storage.delete_system("sol.json"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_keeps_hostile_names_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let systems = dir.path().join("nested/systems");
        let storage = Storage::new(&systems, dir.path().join("sprites"));

        for name in ["../escaped", "..\\escaped", "/etc/escaped", ".."] {
            let filename = storage.save_system(document(name)).unwrap();
            assert!(!filename.contains('/') && !filename.contains('\\'));
            assert!(!filename.starts_with('.'));
            assert!(systems.join(&filename).is_file(), "{filename}");
        }
        assert!(!dir.path().join("nested/escaped.json").exists());
        assert!(!dir.path().join("escaped.json").exists());
        let names: Vec<String> = storage
            .list_systems()
            .unwrap()
            .into_iter()
            .map(|e| e.filename)
            .collect();
        assert_eq!(names, vec!["escaped.json", "etc-escaped.json", "system.json"]);
    }

    #[test]
    fn test_save_rejects_invalid() {
        let (_dir, storage) = storage();
        let mut doc = document("Sol");
        doc["rootBodies"][0]["scale"] = json!(-1.0);
        let err = storage.save_system(doc).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = storage.save_system(json!({ "system": 5 })).unwrap_err();
        assert!(matches!(err, StorageError::Parse(_)));
        assert!(storage.list_systems().unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_and_corrupt() {
        let (dir, storage) = storage();
        assert!(matches!(
            storage.read_system("nope.json"),
            Err(StorageError::NotFound(_))
        ));
        std::fs::create_dir_all(dir.path().join("systems")).unwrap();
        std::fs::write(dir.path().join("systems/bad.json"), "{ not json").unwrap();
        assert_eq!(
            storage.read_system("bad.json").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_sprites() {
        let (dir, storage) = storage();
        std::fs::write(dir.path().join("sprites/sun.png"), [1u8, 2, 3]).unwrap();
        std::fs::write(dir.path().join("sprites/notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("sprites/Earth.PNG"), [4u8]).unwrap();

        assert_eq!(storage.list_sprites().unwrap(), vec!["Earth.PNG", "sun.png"]);
        assert_eq!(storage.read_sprite("sun.png").unwrap(), vec![1, 2, 3]);
        assert!(matches!(storage.read_sprite("notes.txt"), Err(StorageError::BadExtension("png"))));
        assert!(matches!(storage.read_sprite("moon.png"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_missing_sprite_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("systems"), dir.path().join("absent"));
        let err = storage.list_sprites().unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
