//! Application settings

use serde::{Deserialize, Serialize};

/// Orbit animation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Animator ticks per second
    pub tick_hz: f64,
    /// Degrees per second per unit of orbit speed
    pub speed_multiplier: f64,
    /// Start animating when a system is opened
    pub autoplay: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            tick_hz: 30.0,
            speed_multiplier: 10.0,
            autoplay: true,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Selection ring color RGB
    pub selection_color: [u8; 3],
    /// Padding kept free around the auto-fitted system, in pixels
    pub fit_padding: f64,
    /// Zoom ratio per mouse wheel notch
    pub wheel_zoom_step: f64,
    /// Pixels of smooth scroll that count as one wheel notch
    pub wheel_notch_pixels: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [10, 12, 22],
            selection_color: [59, 130, 246],
            fit_padding: 50.0,
            wheel_zoom_step: 1.02,
            wheel_notch_pixels: 10.0,
        }
    }
}

/// Where systems and sprites come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Use the local REST server for the system library and sprites
    pub local_mode: bool,
    /// Base URL of the local server
    pub api_url: String,
    /// Directory scanned for sprite images when not in local mode
    pub sprite_dir: Option<std::path::PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            local_mode: false,
            api_url: "http://127.0.0.1:3001".to_string(),
            sprite_dir: None,
        }
    }
}

impl StorageSettings {
    /// Apply `STARFORGE_LOCAL_MODE` / `STARFORGE_API_URL` overrides
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("STARFORGE_LOCAL_MODE") {
            self.local_mode = matches!(v.trim(), "1" | "true" | "yes" | "on");
        }
        if let Ok(v) = std::env::var("STARFORGE_API_URL") {
            if !v.trim().is_empty() {
                self.api_url = v.trim().trim_end_matches('/').to_string();
            }
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    /// Interface language code ("en" or "ru")
    pub language: String,
    /// Restore the autosaved system at startup
    pub restore_autosave: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: "en".to_string(),
            restore_autosave: true,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub animation: AnimationSettings,
    pub viewport: ViewportSettings,
    pub storage: StorageSettings,
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "starforge", "starforge")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found, then apply
    /// environment overrides
    pub fn load() -> Self {
        let mut settings: Self = Self::config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable settings file: {}", e);
                    None
                }
            })
            .unwrap_or_default();
        settings.storage.apply_env();
        settings
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if std::fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to save settings: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize settings: {}", e),
        }
    }
}
