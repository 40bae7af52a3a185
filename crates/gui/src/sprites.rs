//! Sprite resolver: sprite identifier -> texture, loaded off the UI thread.
//!
//! Loads start lazily the first time the renderer asks for a sprite. A fixed
//! pool of [`LOAD_WORKERS`] threads fetches and decodes; decoded images come
//! back over a channel and are turned into textures in `poll`, once per frame.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use egui::{ColorImage, TextureHandle, TextureId, TextureOptions};

use crate::viewport::frame::SpriteLookup;

/// Where a sprite's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteOrigin {
    /// Already in memory (imported from a bundle)
    Bytes(Arc<[u8]>),
    File(PathBuf),
    Url(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("failed to read sprite file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch sprite: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode sprite: {0}")]
    Decode(#[from] image::ImageError),
}

enum SpriteState {
    Pending,
    Loaded(TextureHandle),
    Failed,
}

/// Threads fetching and decoding sprites
pub const LOAD_WORKERS: usize = 4;

struct LoadJob {
    generation: u64,
    key: String,
    origin: SpriteOrigin,
}

struct LoadResult {
    generation: u64,
    key: String,
    result: Result<ColorImage, SpriteError>,
}

pub struct SpriteResolver {
    sources: HashMap<String, SpriteOrigin>,
    states: HashMap<String, SpriteState>,
    /// Bumped on every mapping change; older results are dropped
    generation: u64,
    /// Same value, read by the workers to skip queued jobs of an old mapping
    shared_generation: Arc<AtomicU64>,
    jobs: Sender<LoadJob>,
    rx: Receiver<LoadResult>,
    /// Woken when a worker finishes
    repaint: Arc<Mutex<Option<egui::Context>>>,
}

impl Default for SpriteResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteResolver {
    pub fn new() -> Self {
        let (jobs, job_rx) = mpsc::channel::<LoadJob>();
        let (tx, rx) = mpsc::channel();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let shared_generation = Arc::new(AtomicU64::new(0));
        let repaint: Arc<Mutex<Option<egui::Context>>> = Arc::new(Mutex::new(None));

        for i in 0..LOAD_WORKERS {
            let job_rx = job_rx.clone();
            let tx = tx.clone();
            let current = shared_generation.clone();
            let repaint = repaint.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("sprite-loader-{i}"))
                .spawn(move || load_worker(job_rx, tx, current, repaint));
            if let Err(e) = spawned {
                tracing::warn!("Cannot start sprite loader {}: {}", i, e);
            }
        }

        Self {
            sources: HashMap::new(),
            states: HashMap::new(),
            generation: 0,
            shared_generation,
            jobs,
            rx,
            repaint,
        }
    }

    /// Context used to request a repaint when a load completes
    pub fn attach(&mut self, ctx: &egui::Context) {
        if let Ok(mut repaint) = self.repaint.lock() {
            *repaint = Some(ctx.clone());
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Known sprite identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn origin(&self, key: &str) -> Option<&SpriteOrigin> {
        self.sources.get(key)
    }

    pub fn sources(&self) -> &HashMap<String, SpriteOrigin> {
        &self.sources
    }

    /// Replace the whole mapping.
    ///
    /// Textures whose identifier disappeared or now points elsewhere are
    /// released. Unchanged loaded textures are kept; pending loads restart.
    pub fn set_sources(&mut self, sources: HashMap<String, SpriteOrigin>) {
        self.generation += 1;
        self.shared_generation.store(self.generation, Ordering::Relaxed);
        let old = std::mem::replace(&mut self.sources, sources);
        self.states.retain(|key, state| {
            matches!(state, SpriteState::Loaded(_))
                && old.get(key).is_some_and(|o| self.sources.get(key) == Some(o))
        });
        tracing::debug!(
            "Sprite mapping changed: {} sources, {} textures kept",
            self.sources.len(),
            self.states.len()
        );
    }

    /// Add or re-point identifiers, keeping the rest of the mapping
    pub fn merge_sources(&mut self, extra: HashMap<String, SpriteOrigin>) {
        let mut merged = self.sources.clone();
        merged.extend(extra);
        self.set_sources(merged);
    }

    pub fn clear(&mut self) {
        self.set_sources(HashMap::new());
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        matches!(self.states.get(key), Some(SpriteState::Loaded(_)))
    }

    pub fn is_failed(&self, key: &str) -> bool {
        matches!(self.states.get(key), Some(SpriteState::Failed))
    }

    pub fn is_pending(&self, key: &str) -> bool {
        matches!(self.states.get(key), Some(SpriteState::Pending))
    }

    /// Start loading `key` if it has a source and no load was attempted yet
    pub fn ensure_requested(&mut self, key: &str) {
        if self.states.contains_key(key) {
            return;
        }
        let Some(origin) = self.sources.get(key).cloned() else {
            return;
        };
        self.states.insert(key.to_string(), SpriteState::Pending);

        let job = LoadJob {
            generation: self.generation,
            key: key.to_string(),
            origin,
        };
        if self.jobs.send(job).is_err() {
            tracing::warn!("Sprite loaders stopped, '{}' keeps its fallback", key);
            self.states.insert(key.to_string(), SpriteState::Failed);
        }
    }

    /// Turn finished loads into textures. Returns how many results were
    /// applied.
    pub fn poll(&mut self, ctx: &egui::Context) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.rx.try_recv() {
            if done.generation != self.generation {
                continue;
            }
            if !matches!(self.states.get(&done.key), Some(SpriteState::Pending)) {
                continue;
            }
            let state = match done.result {
                Ok(image) => SpriteState::Loaded(ctx.load_texture(
                    format!("sprite:{}", done.key),
                    image,
                    TextureOptions::LINEAR,
                )),
                Err(e) => {
                    tracing::warn!("Sprite '{}' unavailable, using fallback: {}", done.key, e);
                    SpriteState::Failed
                }
            };
            self.states.insert(done.key, state);
            applied += 1;
        }
        applied
    }

    fn loaded_texture(&self, key: &str) -> Option<TextureId> {
        match self.states.get(key) {
            Some(SpriteState::Loaded(handle)) => Some(handle.id()),
            _ => None,
        }
    }
}

impl SpriteLookup for SpriteResolver {
    fn texture_for(&mut self, sprite: &str) -> Option<TextureId> {
        self.ensure_requested(sprite);
        self.loaded_texture(sprite)
    }
}

fn load_worker(
    jobs: Arc<Mutex<Receiver<LoadJob>>>,
    tx: Sender<LoadResult>,
    current: Arc<AtomicU64>,
    repaint: Arc<Mutex<Option<egui::Context>>>,
) {
    loop {
        let job = match jobs.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        let Ok(job) = job else {
            break;
        };
        if job.generation != current.load(Ordering::Relaxed) {
            continue;
        }
        let result = fetch_bytes(&job.origin).and_then(|bytes| decode(&bytes));
        let sent = tx.send(LoadResult {
            generation: job.generation,
            key: job.key,
            result,
        });
        if sent.is_err() {
            break;
        }
        if let Some(ctx) = repaint.lock().ok().and_then(|r| r.clone()) {
            ctx.request_repaint();
        }
    }
}

/// Raw bytes behind an origin. Blocks on file and network I/O.
pub fn fetch_bytes(origin: &SpriteOrigin) -> Result<Vec<u8>, SpriteError> {
    match origin {
        SpriteOrigin::Bytes(bytes) => Ok(bytes.to_vec()),
        SpriteOrigin::File(path) => Ok(std::fs::read(path)?),
        SpriteOrigin::Url(url) => {
            let response = reqwest::blocking::get(url)?.error_for_status()?;
            Ok(response.bytes()?.to_vec())
        }
    }
}

/// Decode PNG/JPEG bytes into an egui image
pub fn decode(bytes: &[u8]) -> Result<ColorImage, SpriteError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes)).with_guessed_format()?;
    let rgba = reader.decode()?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Image files directly inside `dir`, keyed by file name
pub fn scan_dir(dir: &Path) -> HashMap<String, SpriteOrigin> {
    let mut found = HashMap::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot read sprite directory {}: {}", dir.display(), e);
            return found;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_sprite_file(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            found.insert(name.to_string(), SpriteOrigin::File(path.clone()));
        }
    }
    found
}

/// Sprite URLs served by the local API
pub fn remote_sources(api_url: &str, names: &[String]) -> HashMap<String, SpriteOrigin> {
    let base = api_url.trim_end_matches('/');
    names
        .iter()
        .map(|name| {
            (
                name.clone(),
                SpriteOrigin::Url(format!("{}/api/sprites/{}", base, name)),
            )
        })
        .collect()
}

pub fn is_sprite_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
}
