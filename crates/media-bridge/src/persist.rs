//! Persistence bridge: project document save/load.
//!
//! The bridge is a required capability, not an optional host hook — an
//! in-memory implementation backs tests and headless use, so a save can
//! never be silently skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cutaway_common::{CutawayError, CutawayResult};

/// Interface to whatever stores project documents.
pub trait PersistenceBridge: Send + Sync {
    /// Write `content` at `path`, creating parent directories as needed.
    fn save_file(&self, path: &Path, content: &str) -> CutawayResult<()>;

    /// Read the content stored at `path`.
    fn load_file(&self, path: &Path) -> CutawayResult<String>;

    /// Whether anything is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Filesystem-backed bridge.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBridge;

impl PersistenceBridge for FsBridge {
    fn save_file(&self, path: &Path, content: &str) -> CutawayResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn load_file(&self, path: &Path) -> CutawayResult<String> {
        if !path.exists() {
            return Err(CutawayError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(std::fs::read_to_string(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory bridge for tests.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceBridge for MemoryBridge {
    fn save_file(&self, path: &Path, content: &str) -> CutawayResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn load_file(&self, path: &Path) -> CutawayResult<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| CutawayError::FileNotFound {
                path: path.to_path_buf(),
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}
