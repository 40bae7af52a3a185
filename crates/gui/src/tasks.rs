//! Background I/O jobs.
//!
//! File and network work runs on the tokio blocking pool; results come back
//! over a channel that the UI thread drains once per frame. Nothing here
//! touches the stores.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use shared::{SystemEntry, SystemFile};

use crate::persistence::{bundle, json, PersistenceError, SystemRepository};
use crate::sprites::{self, SpriteOrigin};
use crate::state::system::Revision;

/// Destructive actions that go through the unsaved-changes check
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    NewSystem(String),
    LoadTemplate,
    OpenFile(PathBuf),
    OpenLibrary(String),
    /// Apply a load that finished after the system was edited
    ApplyLoaded,
}

impl PendingAction {
    pub fn describe(&self) -> String {
        match self {
            PendingAction::NewSystem(name) => format!("create new system '{}'", name),
            PendingAction::LoadTemplate => "load the Sol template".to_string(),
            PendingAction::OpenFile(path) => format!("open {}", path.display()),
            PendingAction::OpenLibrary(name) => format!("open '{}' from the library", name),
            PendingAction::ApplyLoaded => "replace the system with the loaded one".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum TaskOutcome {
    /// A validated document; `sprites` replaces the sprite mapping when set.
    /// `requested_at` is the store revision when the load was asked for.
    Loaded {
        file: SystemFile,
        sprites: Option<HashMap<String, SpriteOrigin>>,
        source: String,
        requested_at: Revision,
    },
    /// `revision` is the store revision the saved snapshot was taken at
    Saved {
        target: String,
        revision: Revision,
    },
    Library(Vec<SystemEntry>),
    Sprites(HashMap<String, SpriteOrigin>),
    Failed {
        action: &'static str,
        error: String,
    },
}

pub struct TaskRunner {
    runtime: Option<tokio::runtime::Runtime>,
    tx: Sender<TaskOutcome>,
    rx: Receiver<TaskOutcome>,
    in_flight: usize,
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("starforge-io")
            .enable_all()
            .build();
        let runtime = match runtime {
            Ok(rt) => Some(rt),
            Err(e) => {
                tracing::warn!("No async runtime, using plain threads: {}", e);
                None
            }
        };
        let (tx, rx) = mpsc::channel();
        Self {
            runtime,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn spawn<F>(&mut self, action: &'static str, job: F)
    where
        F: FnOnce() -> Result<TaskOutcome, PersistenceError> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        let run = move || {
            let outcome = job().unwrap_or_else(|e| {
                tracing::error!("{} failed: {}", action, e);
                TaskOutcome::Failed {
                    action,
                    error: e.to_string(),
                }
            });
            let _ = tx.send(outcome);
        };
        match &self.runtime {
            Some(rt) => {
                rt.spawn_blocking(run);
            }
            None => {
                std::thread::spawn(run);
            }
        }
    }

    /// Finished jobs since the last call
    pub fn poll(&mut self) -> Vec<TaskOutcome> {
        let mut done = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            done.push(outcome);
        }
        done
    }

    /// Open a `.zip` bundle or a `.json` document
    pub fn open_path(&mut self, path: PathBuf, requested_at: Revision) {
        self.spawn("Open", move || {
            let source = path.display().to_string();
            if is_bundle(&path) {
                let bundle = bundle::read_bundle_file(&path)?;
                let sprites = Some(bundle.sprite_sources());
                Ok(TaskOutcome::Loaded {
                    file: bundle.file,
                    sprites,
                    source,
                    requested_at,
                })
            } else {
                Ok(TaskOutcome::Loaded {
                    file: json::read_system_file(&path)?,
                    sprites: None,
                    source,
                    requested_at,
                })
            }
        });
    }

    pub fn save_json(&mut self, path: PathBuf, file: SystemFile, revision: Revision) {
        self.spawn("Save", move || {
            json::write_system_file(&path, &file)?;
            Ok(TaskOutcome::Saved {
                target: path.display().to_string(),
                revision,
            })
        });
    }

    pub fn save_bundle(
        &mut self,
        path: PathBuf,
        file: SystemFile,
        revision: Revision,
        sources: HashMap<String, SpriteOrigin>,
    ) {
        self.spawn("Save bundle", move || {
            let skipped = bundle::write_bundle_file(&path, &file, &sources)?;
            if !skipped.is_empty() {
                tracing::warn!("Bundle saved without sprites: {}", skipped.join(", "));
            }
            Ok(TaskOutcome::Saved {
                target: path.display().to_string(),
                revision,
            })
        });
    }

    pub fn list_library(&mut self, repo: Arc<dyn SystemRepository>) {
        self.spawn("List systems", move || Ok(TaskOutcome::Library(repo.list()?)));
    }

    pub fn load_from_library(
        &mut self,
        repo: Arc<dyn SystemRepository>,
        filename: String,
        requested_at: Revision,
    ) {
        self.spawn("Load from library", move || {
            let file = repo.load(&filename)?;
            Ok(TaskOutcome::Loaded {
                file,
                sprites: None,
                source: filename,
                requested_at,
            })
        });
    }

    /// Delete a library entry and report the refreshed list
    pub fn delete_from_library(&mut self, repo: Arc<dyn SystemRepository>, filename: String) {
        self.spawn("Delete from library", move || {
            repo.delete(&filename)?;
            Ok(TaskOutcome::Library(repo.list()?))
        });
    }

    pub fn save_to_library(
        &mut self,
        repo: Arc<dyn SystemRepository>,
        file: SystemFile,
        revision: Revision,
    ) {
        self.spawn("Save to library", move || {
            let target = repo.save(&file)?;
            Ok(TaskOutcome::Saved { target, revision })
        });
    }

    /// Sprite names from the server, mapped to their URLs under `api_url`
    pub fn fetch_remote_sprites(&mut self, repo: Arc<dyn SystemRepository>, api_url: String) {
        self.spawn("List sprites", move || {
            let names = repo.list_sprites()?;
            Ok(TaskOutcome::Sprites(sprites::remote_sources(&api_url, &names)))
        });
    }

    /// Image files in a local sprite directory
    pub fn scan_sprite_dir(&mut self, dir: PathBuf) {
        self.spawn("Scan sprites", move || {
            Ok(TaskOutcome::Sprites(sprites::scan_dir(&dir)))
        });
    }
}

fn is_bundle(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}
