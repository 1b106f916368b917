//! Periodic autosave planning.
//!
//! The host drives a timer; this module decides when a save is due,
//! generates the autosave path, and reports failures through a callback
//! instead of propagating them into the editing loop.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cutaway_common::CutawayError;
use cutaway_project_model::ProjectDocument;

use crate::persist::PersistenceBridge;

/// Default autosave interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Extension used for project documents.
pub const PROJECT_EXT: &str = "cutaway";

/// Build the autosave path for a project name inside `dir`:
/// `<sanitized-name>_autosave.<ext>`.
pub fn autosave_path(dir: &Path, project_name: &str) -> PathBuf {
    let sanitized = sanitize_name(project_name);
    dir.join(format!("{sanitized}_autosave.{PROJECT_EXT}"))
}

/// Replace path-hostile characters and whitespace with underscores.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// Tracks autosave due-ness and performs saves through a bridge.
pub struct Autosaver {
    interval: Duration,
    last_save: Option<Instant>,
}

impl Autosaver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: None,
        }
    }

    pub fn with_default_interval() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }

    /// Whether a save is due at `now`. The first tick is always due.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_save {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        }
    }

    /// Save the document if due. Failures are reported via `on_error`
    /// and never propagated.
    ///
    /// Returns true when a save was attempted (successfully or not).
    pub fn tick(
        &mut self,
        now: Instant,
        bridge: &dyn PersistenceBridge,
        dir: &Path,
        doc: &ProjectDocument,
        on_error: &dyn Fn(&CutawayError),
    ) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_save = Some(now);

        let path = autosave_path(dir, &doc.project.name);
        let json = match doc.to_json() {
            Ok(json) => json,
            Err(e) => {
                let err = CutawayError::from(e);
                tracing::warn!(error = %err, "Autosave serialization failed");
                on_error(&err);
                return true;
            }
        };

        match bridge.save_file(&path, &json) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Autosaved project");
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Autosave failed");
                on_error(&e);
            }
        }
        true
    }
}
