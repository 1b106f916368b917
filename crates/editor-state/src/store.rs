//! The editor store: exclusive owner of the loaded project.
//!
//! All timeline mutation flows through the store. Operations are
//! tolerant: referencing a missing project, track, or clip is a no-op
//! (returning `None` or `false`), never a panic or an error. The store
//! assumes a single writer; one mutation completes before the next
//! begins.
//!
//! The store itself records nothing in the undo history. Callers that
//! want undo wrap mutations in [`crate::history::ActionKind`] payloads
//! and push them through [`crate::history::History::execute`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_project_model::{
    Clip, Marker, MulticamGroup, PodcastModeSettings, Project, ProjectSettings, Track, TrackKind,
};

use crate::export::ExportJobState;
use crate::notice::NoticeLog;
use crate::selection::{SelectionState, TimelineViewport};

/// Multicam session state held alongside the project.
///
/// Groups reference project tracks by id; the podcast settings map
/// speakers onto group angles. This lives on the store rather than in
/// the saved document because switch previews and speaker bindings are
/// session state until the user commits them to the timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MulticamState {
    pub groups: Vec<MulticamGroup>,
    /// The group the multicam panel is focused on.
    pub active_group: Option<Uuid>,
    pub podcast: PodcastModeSettings,
}

impl MulticamState {
    pub fn group(&self, group_id: Uuid) -> Option<&MulticamGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: Uuid) -> Option<&mut MulticamGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    pub fn group_of_track(&self, track_id: Uuid) -> Option<&MulticamGroup> {
        self.groups.iter().find(|g| g.contains_track(track_id))
    }
}

/// Partial update for a track. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPatch {
    pub name: Option<String>,
    pub muted: Option<bool>,
    pub solo: Option<bool>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub height: Option<u32>,
    pub color: Option<Option<String>>,
}

/// Partial update for a clip. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub locked: Option<bool>,
    pub muted: Option<bool>,
    pub volume: Option<f64>,
}

/// The canonical mutable editing session.
#[derive(Debug, Default)]
pub struct EditorStore {
    project: Option<Project>,
    /// Multicam groups and podcast settings for the loaded project.
    pub multicam: MulticamState,
    /// Playhead position in seconds.
    pub playhead: f64,
    pub selection: SelectionState,
    pub viewport: TimelineViewport,
    /// The current (or most recent) export job.
    pub export: Option<ExportJobState>,
    pub notices: NoticeLog,
    /// Unsaved changes since the last save or load.
    pub project_modified: bool,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- project lifecycle ----

    /// Create and load a fresh project, replacing any loaded one.
    pub fn create_new_project(&mut self, name: impl Into<String>, settings: ProjectSettings) {
        let project = Project::new(name, settings);
        tracing::info!(project_id = %project.id, name = %project.name, "Created project");
        self.install_project(project);
        self.project_modified = true;
    }

    /// Replace the loaded project wholesale, resetting session state.
    pub fn load_project(&mut self, project: Project) {
        tracing::info!(project_id = %project.id, name = %project.name, "Loaded project");
        self.install_project(project);
        self.project_modified = false;
    }

    fn install_project(&mut self, project: Project) {
        self.project = Some(project);
        self.multicam = MulticamState::default();
        self.playhead = 0.0;
        self.selection.clear();
        self.viewport = TimelineViewport::default();
        self.export = None;
    }

    /// Close the loaded project and reset session state.
    pub fn clear_project(&mut self) {
        self.project = None;
        self.multicam = MulticamState::default();
        self.playhead = 0.0;
        self.selection.clear();
        self.export = None;
        self.project_modified = false;
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    pub fn has_project(&self) -> bool {
        self.project.is_some()
    }

    /// Mark the project dirty and bump its modified timestamp.
    pub fn mark_modified(&mut self) {
        if let Some(project) = &mut self.project {
            project.touch();
            self.project_modified = true;
        }
    }

    /// Clear the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.project_modified = false;
    }

    // ---- tracks ----

    /// Append a new track. With no name given, the default is
    /// "<Kind> Track N" counting existing tracks of that kind.
    pub fn add_track(&mut self, kind: TrackKind, name: Option<String>) -> Option<Uuid> {
        let project = self.project.as_mut()?;
        let name = name.unwrap_or_else(|| {
            format!("{} Track {}", kind.label(), project.count_tracks(kind) + 1)
        });
        let track = Track::new(kind, name);
        let id = track.id;
        tracing::debug!(track_id = %id, kind = kind.label(), "Added track");
        project.tracks.push(track);
        self.mark_modified();
        Some(id)
    }

    /// Remove a track, returning it with its former index. Missing ids
    /// are a no-op. Clips on the track are removed with it; the caller
    /// is responsible for any dependent multicam cleanup.
    pub fn remove_track(&mut self, track_id: Uuid) -> Option<(Track, usize)> {
        let project = self.project.as_mut()?;
        let index = project.tracks.iter().position(|t| t.id == track_id)?;
        let track = project.tracks.remove(index);
        self.selection.tracks.retain(|id| *id != track_id);
        self.selection
            .clips
            .retain(|id| track.clip(*id).is_none());
        tracing::debug!(track_id = %track_id, index, "Removed track");
        self.mark_modified();
        Some((track, index))
    }

    /// Reorder tracks to match `order`. Ids not present in the project
    /// are silently dropped; project tracks missing from `order` keep
    /// their relative order at the end.
    pub fn reorder_tracks(&mut self, order: &[Uuid]) {
        let Some(project) = self.project.as_mut() else {
            return;
        };
        let mut reordered = Vec::with_capacity(project.tracks.len());
        for id in order {
            if let Some(pos) = project.tracks.iter().position(|t| t.id == *id) {
                reordered.push(project.tracks.remove(pos));
            }
        }
        reordered.append(&mut project.tracks);
        project.tracks = reordered;
        self.mark_modified();
    }

    /// Apply a partial update to a track. Missing ids are a no-op.
    pub fn update_track(&mut self, track_id: Uuid, patch: &TrackPatch) -> bool {
        let Some(track) = self
            .project
            .as_mut()
            .and_then(|p| p.track_mut(track_id))
        else {
            return false;
        };
        if let Some(name) = &patch.name {
            track.name = name.clone();
        }
        if let Some(muted) = patch.muted {
            track.muted = muted;
        }
        if let Some(solo) = patch.solo {
            track.solo = solo;
        }
        if let Some(locked) = patch.locked {
            track.locked = locked;
        }
        if let Some(visible) = patch.visible {
            track.visible = visible;
        }
        if let Some(height) = patch.height {
            track.height = height;
        }
        if let Some(color) = &patch.color {
            track.color = color.clone();
        }
        self.mark_modified();
        true
    }

    /// Current track order, for building reorder payloads.
    pub fn track_order(&self) -> Vec<Uuid> {
        self.project
            .as_ref()
            .map(|p| p.tracks.iter().map(|t| t.id).collect())
            .unwrap_or_default()
    }

    // ---- clips ----

    /// Place a clip on a track, optionally overriding its start time
    /// (e.g. dropping at the playhead). The clip's `track_id` is
    /// rewritten to the target track and the track is re-sorted, so the
    /// clip's slot in the array follows from its start time. Missing
    /// tracks are a no-op.
    pub fn add_clip(&mut self, mut clip: Clip, track_id: Uuid, start_time: Option<f64>) -> Option<Uuid> {
        let project = self.project.as_mut()?;
        let track = project.track_mut(track_id)?;
        clip.track_id = track_id;
        if let Some(start_time) = start_time {
            clip.set_start_time(start_time);
        }
        let id = clip.id;
        track.clips.push(clip);
        track.sort_clips();
        tracing::debug!(clip_id = %id, track_id = %track_id, "Added clip");
        self.mark_modified();
        Some(id)
    }

    /// Remove a clip wherever it lives, returning it. Missing ids are a
    /// no-op.
    pub fn remove_clip(&mut self, clip_id: Uuid) -> Option<Clip> {
        let project = self.project.as_mut()?;
        for track in &mut project.tracks {
            if let Some(pos) = track.clips.iter().position(|c| c.id == clip_id) {
                let clip = track.clips.remove(pos);
                self.selection.deselect_clip(clip_id);
                tracing::debug!(clip_id = %clip_id, "Removed clip");
                self.mark_modified();
                return Some(clip);
            }
        }
        None
    }

    /// Apply a partial update to a clip. Missing ids are a no-op.
    pub fn update_clip(&mut self, clip_id: Uuid, patch: &ClipPatch) -> bool {
        let Some(clip) = self.clip_mut(clip_id) else {
            return false;
        };
        if let Some(name) = &patch.name {
            clip.name = name.clone();
        }
        if let Some(locked) = patch.locked {
            clip.locked = locked;
        }
        if let Some(muted) = patch.muted {
            clip.muted = muted;
        }
        if let Some(volume) = patch.volume {
            clip.volume = volume.clamp(0.0, 2.0);
        }
        self.mark_modified();
        true
    }

    /// Move a clip to a new start time, possibly onto another track.
    /// Both tracks are re-sorted. Missing clip or target track is a
    /// no-op.
    pub fn move_clip(&mut self, clip_id: Uuid, to_track: Uuid, new_start: f64) -> bool {
        let project = match self.project.as_mut() {
            Some(p) => p,
            None => return false,
        };
        if project.track(to_track).is_none() {
            return false;
        }
        let Some(mut clip) = take_clip(project, clip_id) else {
            return false;
        };
        clip.track_id = to_track;
        clip.set_start_time(new_start);
        if let Some(track) = project.track_mut(to_track) {
            track.clips.push(clip);
            track.sort_clips();
        }
        self.mark_modified();
        true
    }

    /// Retrim a clip. This is the low-level primitive: the clip keeps
    /// its `start_time` and its end moves with the new duration.
    pub fn trim_clip(&mut self, clip_id: Uuid, trim_start: f64, trim_end: f64) -> bool {
        let Some(clip) = self.clip_mut(clip_id) else {
            return false;
        };
        clip.set_trim(trim_start, trim_end);
        self.mark_modified();
        true
    }

    /// Split a clip at timeline position `at`, returning the ids of the
    /// left and right halves. The left half keeps the original id. The
    /// two halves exactly cover the original placement and source
    /// range; the right half inherits effects and the outgoing
    /// transition. A split at or outside the clip bounds is a no-op.
    pub fn split_clip(&mut self, clip_id: Uuid, at: f64) -> Option<(Uuid, Uuid)> {
        let project = self.project.as_mut()?;
        let track = project
            .tracks
            .iter_mut()
            .find(|t| t.clip(clip_id).is_some())?;
        let clip = track.clip_mut(clip_id)?;
        if at <= clip.start_time || at >= clip.end_time {
            return None;
        }

        let trim_split = clip.trim_start + (at - clip.start_time);
        let mut right = clip.clone();
        right.id = Uuid::new_v4();

        // Left keeps the in transition, right keeps the out.
        clip.transition_out = None;
        clip.set_trim(clip.trim_start, trim_split);

        right.transition_in = None;
        right.set_start_time(at);
        right.set_trim(trim_split, right.trim_end);

        let right_id = right.id;
        track.clips.push(right);
        track.sort_clips();
        tracing::debug!(clip_id = %clip_id, at, new_clip = %right_id, "Split clip");
        self.mark_modified();
        Some((clip_id, right_id))
    }

    /// Find a clip anywhere in the project.
    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.project
            .as_ref()?
            .tracks
            .iter()
            .find_map(|t| t.clip(clip_id))
    }

    fn clip_mut(&mut self, clip_id: Uuid) -> Option<&mut Clip> {
        self.project
            .as_mut()?
            .tracks
            .iter_mut()
            .find_map(|t| t.clip_mut(clip_id))
    }

    // ---- markers ----

    /// Add a marker, keeping markers sorted. No-op without a project.
    pub fn add_marker(&mut self, marker: Marker) -> Option<Uuid> {
        let project = self.project.as_mut()?;
        let id = marker.id;
        project.markers.push(marker);
        project.sort_markers();
        self.mark_modified();
        Some(id)
    }

    /// Rename and/or move a marker, keeping markers sorted. `None`
    /// fields are left untouched; missing ids are a no-op.
    pub fn update_marker(&mut self, marker_id: Uuid, time: Option<f64>, name: Option<String>) -> bool {
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let Some(marker) = project.markers.iter_mut().find(|m| m.id == marker_id) else {
            return false;
        };
        if let Some(time) = time {
            marker.time = time.max(0.0);
        }
        if let Some(name) = name {
            marker.name = name;
        }
        project.sort_markers();
        self.mark_modified();
        true
    }

    /// Remove a marker by id, returning it.
    pub fn remove_marker(&mut self, marker_id: Uuid) -> Option<Marker> {
        let project = self.project.as_mut()?;
        let pos = project.markers.iter().position(|m| m.id == marker_id)?;
        let marker = project.markers.remove(pos);
        self.mark_modified();
        Some(marker)
    }

    // ---- playback and export ----

    /// Move the playhead, clamped to non-negative time.
    pub fn set_playhead(&mut self, time: f64) {
        self.playhead = time.max(0.0);
    }

    /// Begin tracking a new export job, replacing a finished one.
    /// Refused (with a user notice) while a job is still active.
    pub fn start_export(&mut self, output_path: impl Into<String>) -> Option<Uuid> {
        if let Some(job) = &self.export {
            if job.is_active() {
                self.notices
                    .push_warning("An export is already running".to_string());
                return None;
            }
        }
        let job = ExportJobState::new(output_path);
        let id = job.job_id;
        self.export = Some(job);
        Some(id)
    }

    // ---- primitives used by undo/redo replay ----
    //
    // Public so recorded histories can be replayed against a store from
    // outside this crate, e.g. when restoring a serialized session.

    /// Insert a track at an exact index (clamped to the track count).
    pub fn insert_track_at(&mut self, track: Track, index: usize) {
        if let Some(project) = self.project.as_mut() {
            let index = index.min(project.tracks.len());
            project.tracks.insert(index, track);
            self.mark_modified();
        }
    }

    /// Put a clip back on its recorded track and re-sort.
    pub fn restore_clip(&mut self, clip: Clip) {
        let track_id = clip.track_id;
        if let Some(track) = self.project.as_mut().and_then(|p| p.track_mut(track_id)) {
            track.clips.push(clip);
            track.sort_clips();
            self.mark_modified();
        }
    }

    /// Replace a clip in place by id, re-sorting its track.
    pub fn replace_clip(&mut self, clip: Clip) {
        let Some(project) = self.project.as_mut() else {
            return;
        };
        for track in &mut project.tracks {
            if let Some(pos) = track.clips.iter().position(|c| c.id == clip.id) {
                track.clips[pos] = clip;
                track.sort_clips();
                self.mark_modified();
                return;
            }
        }
    }

    /// Replace the whole project, keeping session state.
    pub fn replace_project(&mut self, project: Project) {
        self.project = Some(project);
        self.project_modified = true;
    }

    /// Reset the project's `modified_at` to a recorded stamp. Every
    /// mutation bumps the stamp, including the ones replay performs, so
    /// undo and redo put back the stamp captured with the action to
    /// reproduce the serialized project exactly.
    pub fn restore_modified_stamp(&mut self, stamp: String) {
        if let Some(project) = self.project.as_mut() {
            project.modified_at = stamp;
        }
    }
}

/// Detach a clip from whichever track holds it.
fn take_clip(project: &mut Project, clip_id: Uuid) -> Option<Clip> {
    for track in &mut project.tracks {
        if let Some(pos) = track.clips.iter().position(|c| c.id == clip_id) {
            return Some(track.clips.remove(pos));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutaway_project_model::{AudioProps, SourceRef, TransitionKind, TransitionRef, VideoProps};

    fn store_with_project() -> EditorStore {
        let mut store = EditorStore::new();
        store.create_new_project("Episode 12", ProjectSettings::default());
        store
    }

    fn video_props() -> VideoProps {
        VideoProps {
            width: 1920,
            height: 1080,
            frame_rate: 30.0,
            codec: "h264".to_string(),
            has_audio: true,
            transform: Default::default(),
        }
    }

    fn video_clip(track_id: Uuid, start: f64, duration: f64) -> Clip {
        Clip::video(
            "clip",
            SourceRef::new("sources/a.mp4"),
            track_id,
            start,
            duration,
            video_props(),
        )
    }

    #[test]
    fn test_default_track_names_count_per_kind() {
        let mut store = store_with_project();
        store.add_track(TrackKind::Video, None);
        store.add_track(TrackKind::Audio, None);
        store.add_track(TrackKind::Video, None);

        let names: Vec<&str> = store
            .project()
            .unwrap()
            .tracks
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Video Track 1", "Audio Track 1", "Video Track 2"]);
    }

    #[test]
    fn test_operations_without_project_are_noops() {
        let mut store = EditorStore::new();
        assert!(store.add_track(TrackKind::Video, None).is_none());
        assert!(!store.move_clip(Uuid::new_v4(), Uuid::new_v4(), 1.0));
        assert!(store.remove_clip(Uuid::new_v4()).is_none());
        store.reorder_tracks(&[Uuid::new_v4()]);
        assert!(!store.project_modified);
    }

    #[test]
    fn test_remove_track_returns_index_and_prunes_selection() {
        let mut store = store_with_project();
        let t1 = store.add_track(TrackKind::Video, None).unwrap();
        let t2 = store.add_track(TrackKind::Audio, None).unwrap();
        let clip_id = store
            .add_clip(video_clip(t2, 0.0, 3.0), t2, None)
            .unwrap();
        store.selection.select_track(t2, false);
        store.selection.select_clip(clip_id, false);

        let (track, index) = store.remove_track(t2).unwrap();
        assert_eq!(track.id, t2);
        assert_eq!(index, 1);
        assert!(store.selection.tracks.is_empty());
        assert!(store.selection.clips.is_empty());
        assert_eq!(store.project().unwrap().tracks[0].id, t1);
    }

    #[test]
    fn test_reorder_tracks_drops_unknown_ids() {
        let mut store = store_with_project();
        let t1 = store.add_track(TrackKind::Video, None).unwrap();
        let t2 = store.add_track(TrackKind::Audio, None).unwrap();

        store.reorder_tracks(&[t2, Uuid::new_v4(), t1]);
        assert_eq!(store.track_order(), vec![t2, t1]);

        // Tracks missing from the order keep their place at the end.
        store.reorder_tracks(&[t1]);
        assert_eq!(store.track_order(), vec![t1, t2]);
    }

    #[test]
    fn test_add_clip_sorts_by_start_time() {
        let mut store = store_with_project();
        let t = store.add_track(TrackKind::Video, None).unwrap();
        store.add_clip(video_clip(t, 6.0, 2.0), t, None);
        store.add_clip(video_clip(t, 1.0, 2.0), t, None);
        store.add_clip(video_clip(t, 3.0, 2.0), t, Some(0.5));

        let starts: Vec<f64> = store.project().unwrap().tracks[0]
            .clips
            .iter()
            .map(|c| c.start_time)
            .collect();
        assert_eq!(starts, vec![0.5, 1.0, 6.0]);
    }

    #[test]
    fn test_move_clip_between_tracks() {
        let mut store = store_with_project();
        let t1 = store.add_track(TrackKind::Video, None).unwrap();
        let t2 = store.add_track(TrackKind::Video, None).unwrap();
        let clip_id = store.add_clip(video_clip(t1, 2.0, 4.0), t1, None).unwrap();

        assert!(store.move_clip(clip_id, t2, 10.0));
        let project = store.project().unwrap();
        assert!(project.track(t1).unwrap().clips.is_empty());
        let moved = project.track(t2).unwrap().clip(clip_id).unwrap();
        assert_eq!(moved.track_id, t2);
        assert!((moved.start_time - 10.0).abs() < 1e-9);
        assert!((moved.end_time - 14.0).abs() < 1e-9);
        assert!(moved.invariant_violations().is_empty());
    }

    #[test]
    fn test_move_clip_to_missing_track_is_noop() {
        let mut store = store_with_project();
        let t1 = store.add_track(TrackKind::Video, None).unwrap();
        let clip_id = store.add_clip(video_clip(t1, 2.0, 4.0), t1, None).unwrap();

        assert!(!store.move_clip(clip_id, Uuid::new_v4(), 0.0));
        assert!(store.clip(clip_id).is_some());
    }

    #[test]
    fn test_split_clip_covers_original() {
        let mut store = store_with_project();
        let t = store.add_track(TrackKind::Video, None).unwrap();
        let mut clip = video_clip(t, 2.0, 10.0);
        clip.set_trim(1.0, 11.0);
        clip.set_start_time(2.0);
        clip.transition_in = Some(TransitionRef {
            kind: TransitionKind::Fade,
            duration: 0.5,
        });
        clip.transition_out = Some(TransitionRef {
            kind: TransitionKind::Dissolve,
            duration: 0.5,
        });
        let clip_id = store.add_clip(clip, t, None).unwrap();

        let (left_id, right_id) = store.split_clip(clip_id, 5.0).unwrap();
        assert_eq!(left_id, clip_id);

        let project = store.project().unwrap();
        let left = project.track(t).unwrap().clip(left_id).unwrap();
        let right = project.track(t).unwrap().clip(right_id).unwrap();

        assert!((left.start_time - 2.0).abs() < 1e-9);
        assert!((left.end_time - 5.0).abs() < 1e-9);
        assert!((left.trim_start - 1.0).abs() < 1e-9);
        assert!((left.trim_end - 4.0).abs() < 1e-9);

        assert!((right.start_time - 5.0).abs() < 1e-9);
        assert!((right.end_time - 12.0).abs() < 1e-9);
        assert!((right.trim_start - 4.0).abs() < 1e-9);
        assert!((right.trim_end - 11.0).abs() < 1e-9);

        // Boundary transitions split with the clip halves.
        assert!(left.transition_in.is_some());
        assert!(left.transition_out.is_none());
        assert!(right.transition_in.is_none());
        assert!(right.transition_out.is_some());

        assert!(left.invariant_violations().is_empty());
        assert!(right.invariant_violations().is_empty());
    }

    #[test]
    fn test_split_outside_bounds_is_noop() {
        let mut store = store_with_project();
        let t = store.add_track(TrackKind::Video, None).unwrap();
        let clip_id = store.add_clip(video_clip(t, 2.0, 4.0), t, None).unwrap();

        assert!(store.split_clip(clip_id, 2.0).is_none());
        assert!(store.split_clip(clip_id, 6.0).is_none());
        assert!(store.split_clip(clip_id, 99.0).is_none());
        assert_eq!(store.project().unwrap().track(t).unwrap().clips.len(), 1);
    }

    #[test]
    fn test_trim_clip_keeps_start_time() {
        let mut store = store_with_project();
        let t = store.add_track(TrackKind::Audio, None).unwrap();
        let clip = Clip::audio(
            "mic",
            SourceRef::new("sources/mic.wav"),
            t,
            3.0,
            10.0,
            AudioProps {
                channels: 1,
                sample_rate: 48000,
                bit_rate: 192,
                waveform: vec![],
                gain_db: 0.0,
            },
        );
        let clip_id = store.add_clip(clip, t, None).unwrap();

        assert!(store.trim_clip(clip_id, 2.0, 6.0));
        let clip = store.clip(clip_id).unwrap();
        assert!((clip.start_time - 3.0).abs() < 1e-9);
        assert!((clip.duration - 4.0).abs() < 1e-9);
        assert!((clip.end_time - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_markers_stay_sorted() {
        let mut store = store_with_project();
        use cutaway_project_model::MarkerKind;
        store.add_marker(Marker::new(9.0, "outro", MarkerKind::Chapter));
        store.add_marker(Marker::new(1.0, "intro", MarkerKind::Chapter));
        let times: Vec<f64> = store
            .project()
            .unwrap()
            .markers
            .iter()
            .map(|m| m.time)
            .collect();
        assert_eq!(times, vec![1.0, 9.0]);
    }

    #[test]
    fn test_update_marker_resorts() {
        let mut store = store_with_project();
        use cutaway_project_model::MarkerKind;
        let early = store
            .add_marker(Marker::new(1.0, "intro", MarkerKind::Chapter))
            .unwrap();
        store.add_marker(Marker::new(5.0, "mid", MarkerKind::Chapter));

        assert!(store.update_marker(early, Some(9.0), Some("outro".to_string())));
        let markers = &store.project().unwrap().markers;
        assert_eq!(markers[0].name, "mid");
        assert_eq!(markers[1].name, "outro");
        assert!(!store.update_marker(Uuid::new_v4(), Some(1.0), None));
    }

    #[test]
    fn test_start_export_refuses_concurrent_job() {
        let mut store = store_with_project();
        let first = store.start_export("/out/a.mp4");
        assert!(first.is_some());
        assert!(store.start_export("/out/b.mp4").is_none());
        assert_eq!(store.notices.entries().len(), 1);

        store.export.as_mut().unwrap().complete();
        assert!(store.start_export("/out/b.mp4").is_some());
    }

    #[test]
    fn test_load_project_resets_session_state() {
        let mut store = store_with_project();
        store.set_playhead(42.0);
        store.selection.select_track(Uuid::new_v4(), false);
        store.mark_modified();

        store.load_project(Project::new("Other", ProjectSettings::default()));
        assert_eq!(store.playhead, 0.0);
        assert!(store.selection.tracks.is_empty());
        assert!(!store.project_modified);
    }

    #[test]
    fn test_update_clip_clamps_volume() {
        let mut store = store_with_project();
        let t = store.add_track(TrackKind::Video, None).unwrap();
        let clip_id = store.add_clip(video_clip(t, 0.0, 2.0), t, None).unwrap();

        store.update_clip(
            clip_id,
            &ClipPatch {
                volume: Some(5.0),
                ..ClipPatch::default()
            },
        );
        assert_eq!(store.clip(clip_id).unwrap().volume, 2.0);
    }
}
