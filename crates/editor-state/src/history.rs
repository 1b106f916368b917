//! Linear undo/redo over serializable action payloads.
//!
//! Every undoable edit is described by an [`ActionKind`]: a tagged
//! payload carrying the data needed to apply the edit forward and to
//! revert it exactly. No closures, no diffing — replaying the same
//! payload always produces the same project, which keeps N undos
//! followed by N redos bit-identical and lets a session's history be
//! serialized for diagnostics.
//!
//! The history is a linear list with a cursor. Executing a new action
//! discards the redo tail; exceeding the entry cap evicts the oldest
//! action (which then becomes unreachable by undo).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_project_model::{Clip, Marker, Project, Track};

use crate::store::{EditorStore, TrackPatch};

/// Default undo depth, matching the configurable editing default.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// A serializable, invertible edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    AddTrack {
        track: Track,
        index: usize,
    },
    RemoveTrack {
        track: Track,
        index: usize,
    },
    ReorderTracks {
        before: Vec<Uuid>,
        after: Vec<Uuid>,
    },
    UpdateTrack {
        track_id: Uuid,
        before: TrackPatch,
        after: TrackPatch,
    },
    AddClip {
        clip: Clip,
    },
    RemoveClip {
        clip: Clip,
    },
    /// Full before/after clip snapshots; covers patches, trims that are
    /// part of a larger gesture, and effect changes alike.
    UpdateClip {
        before: Clip,
        after: Clip,
    },
    MoveClip {
        clip_id: Uuid,
        from_track: Uuid,
        to_track: Uuid,
        old_start: f64,
        new_start: f64,
    },
    TrimClip {
        clip_id: Uuid,
        before: (f64, f64),
        after: (f64, f64),
    },
    /// Snapshots of the original clip and both halves, so redo recreates
    /// the right half with the same id every time.
    SplitClip {
        before: Clip,
        left: Clip,
        right: Clip,
    },
    AddMarker {
        marker: Marker,
    },
    RemoveMarker {
        marker: Marker,
    },
    /// Several edits applied as one undo step, in order. Struct-shaped
    /// so the `action` tag has a field map to sit in when serialized.
    Batch { actions: Vec<ActionKind> },
    /// Wholesale project replacement, used by batch pipelines that touch
    /// many clips at once.
    ReplaceProject {
        before: Box<Project>,
        after: Box<Project>,
    },
}

impl ActionKind {
    /// Apply the edit forward.
    pub fn apply(&self, store: &mut EditorStore) {
        match self {
            ActionKind::AddTrack { track, index } => {
                store.insert_track_at(track.clone(), *index);
            }
            ActionKind::RemoveTrack { track, .. } => {
                store.remove_track(track.id);
            }
            ActionKind::ReorderTracks { after, .. } => {
                store.reorder_tracks(after);
            }
            ActionKind::UpdateTrack {
                track_id, after, ..
            } => {
                store.update_track(*track_id, after);
            }
            ActionKind::AddClip { clip } => {
                store.restore_clip(clip.clone());
            }
            ActionKind::RemoveClip { clip } => {
                store.remove_clip(clip.id);
            }
            ActionKind::UpdateClip { after, .. } => {
                store.replace_clip(after.clone());
            }
            ActionKind::MoveClip {
                clip_id,
                to_track,
                new_start,
                ..
            } => {
                store.move_clip(*clip_id, *to_track, *new_start);
            }
            ActionKind::TrimClip { clip_id, after, .. } => {
                store.trim_clip(*clip_id, after.0, after.1);
            }
            ActionKind::SplitClip { before, left, right } => {
                store.remove_clip(before.id);
                store.restore_clip(left.clone());
                store.restore_clip(right.clone());
            }
            ActionKind::AddMarker { marker } => {
                store.add_marker(marker.clone());
            }
            ActionKind::RemoveMarker { marker } => {
                store.remove_marker(marker.id);
            }
            ActionKind::Batch { actions } => {
                for action in actions {
                    action.apply(store);
                }
            }
            ActionKind::ReplaceProject { after, .. } => {
                store.replace_project((**after).clone());
            }
        }
    }

    /// Revert the edit exactly.
    pub fn revert(&self, store: &mut EditorStore) {
        match self {
            ActionKind::AddTrack { track, .. } => {
                store.remove_track(track.id);
            }
            ActionKind::RemoveTrack { track, index } => {
                store.insert_track_at(track.clone(), *index);
            }
            ActionKind::ReorderTracks { before, .. } => {
                store.reorder_tracks(before);
            }
            ActionKind::UpdateTrack {
                track_id, before, ..
            } => {
                store.update_track(*track_id, before);
            }
            ActionKind::AddClip { clip } => {
                store.remove_clip(clip.id);
            }
            ActionKind::RemoveClip { clip } => {
                store.restore_clip(clip.clone());
            }
            ActionKind::UpdateClip { before, .. } => {
                store.replace_clip(before.clone());
            }
            ActionKind::MoveClip {
                clip_id,
                from_track,
                old_start,
                ..
            } => {
                store.move_clip(*clip_id, *from_track, *old_start);
            }
            ActionKind::TrimClip { clip_id, before, .. } => {
                store.trim_clip(*clip_id, before.0, before.1);
            }
            ActionKind::SplitClip { before, left, right } => {
                store.remove_clip(left.id);
                store.remove_clip(right.id);
                store.restore_clip(before.clone());
            }
            ActionKind::AddMarker { marker } => {
                store.remove_marker(marker.id);
            }
            ActionKind::RemoveMarker { marker } => {
                store.add_marker(marker.clone());
            }
            ActionKind::Batch { actions } => {
                for action in actions.iter().rev() {
                    action.revert(store);
                }
            }
            ActionKind::ReplaceProject { before, .. } => {
                store.replace_project((**before).clone());
            }
        }
    }
}

/// One recorded edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditAction {
    pub id: Uuid,
    /// Human-readable label for the undo menu ("Split Clip", ...).
    pub description: String,
    /// When the edit was made (ISO 8601).
    pub timestamp: String,
    /// Project `modified_at` before the edit; undo puts it back so the
    /// reverted project serializes identically to the original.
    pub modified_before: Option<String>,
    /// Project `modified_at` right after the edit; redo puts it back.
    pub modified_after: Option<String>,
    pub kind: ActionKind,
}

/// The linear undo/redo history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    entries: Vec<EditAction>,
    /// Index of the last applied entry, -1 when nothing is applied.
    index: isize,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: -1,
            max_entries: max_entries.max(1),
        }
    }

    /// Apply an edit and record it. Any redoable tail is discarded; the
    /// oldest entry is evicted past the cap.
    pub fn execute(
        &mut self,
        store: &mut EditorStore,
        description: impl Into<String>,
        kind: ActionKind,
    ) {
        let modified_before = store.project().map(|p| p.modified_at.clone());
        kind.apply(store);
        let modified_after = store.project().map(|p| p.modified_at.clone());

        self.entries.truncate((self.index + 1) as usize);
        let description = description.into();
        tracing::debug!(%description, "Recorded edit");
        self.entries.push(EditAction {
            id: Uuid::new_v4(),
            description,
            timestamp: chrono::Utc::now().to_rfc3339(),
            modified_before,
            modified_after,
            kind,
        });
        self.index = self.entries.len() as isize - 1;

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
            self.index = (self.index - 1).max(0);
        }
    }

    /// Revert the last applied edit. Returns its description, or `None`
    /// when there is nothing to undo.
    pub fn undo(&mut self, store: &mut EditorStore) -> Option<String> {
        if self.index < 0 {
            return None;
        }
        let action = &self.entries[self.index as usize];
        action.kind.revert(store);
        if let Some(stamp) = &action.modified_before {
            store.restore_modified_stamp(stamp.clone());
        }
        tracing::debug!(description = %action.description, "Undid edit");
        let description = action.description.clone();
        self.index -= 1;
        Some(description)
    }

    /// Re-apply the next reverted edit. Returns its description, or
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut EditorStore) -> Option<String> {
        if self.index + 1 >= self.entries.len() as isize {
            return None;
        }
        self.index += 1;
        let action = &self.entries[self.index as usize];
        action.kind.apply(store);
        if let Some(stamp) = &action.modified_after {
            store.restore_modified_stamp(stamp.clone());
        }
        tracing::debug!(description = %action.description, "Redid edit");
        Some(action.description.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.index >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len() as isize
    }

    /// Description of the edit undo would revert.
    pub fn undo_description(&self) -> Option<&str> {
        if self.index < 0 {
            return None;
        }
        Some(&self.entries[self.index as usize].description)
    }

    /// Description of the edit redo would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        let next = self.index + 1;
        if next >= self.entries.len() as isize {
            return None;
        }
        Some(&self.entries[next as usize].description)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all recorded edits, e.g. after loading a project.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = -1;
    }
}
