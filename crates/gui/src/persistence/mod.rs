//! Saving and loading systems: plain JSON, ZIP bundles, and the local-mode
//! REST server.

pub mod bundle;
pub mod json;
pub mod remote;

use shared::validation::ValidationError;
use shared::{SystemEntry, SystemFile};

use crate::sprites::SpriteError;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid ZIP bundle: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("ZIP file does not contain system.json")]
    MissingSystemJson,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error("no system to save")]
    NoSystem,
}

/// A library of saved systems, addressed by file name
pub trait SystemRepository: Send + Sync {
    fn list(&self) -> Result<Vec<SystemEntry>, PersistenceError>;
    fn load(&self, filename: &str) -> Result<SystemFile, PersistenceError>;
    /// Returns the file name the system was stored under
    fn save(&self, file: &SystemFile) -> Result<String, PersistenceError>;
    fn delete(&self, filename: &str) -> Result<(), PersistenceError>;
    fn list_sprites(&self) -> Result<Vec<String>, PersistenceError>;
}
