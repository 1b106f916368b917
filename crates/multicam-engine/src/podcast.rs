//! Podcast mode: speakers bound to tracks, switched with one key.
//!
//! The podcast layer owns no state of its own. Speakers and key
//! bindings live in the store's [`PodcastModeSettings`]; switching
//! resolves speaker → track → owning multicam group → angle and
//! delegates to the angle switcher, using the configured transition
//! duration.

use uuid::Uuid;

use cutaway_editor_state::EditorStore;
use cutaway_project_model::{Speaker, SwitchTransition};

use crate::engine::{angle_color, switch_angle_with_transition};

/// Register a speaker bound to a track. Returns `None` when the track
/// does not exist or already has a speaker.
pub fn add_speaker(
    store: &mut EditorStore,
    name: impl Into<String>,
    track_id: Uuid,
) -> Option<Uuid> {
    if store.project().and_then(|p| p.track(track_id)).is_none() {
        return None;
    }
    if store.multicam.podcast.speaker_for_track(track_id).is_some() {
        return None;
    }
    let index = store.multicam.podcast.speakers.len();
    let speaker = Speaker {
        id: Uuid::new_v4(),
        name: name.into(),
        track_id,
        color: angle_color(index),
        avatar: None,
        voice_profile: None,
    };
    let id = speaker.id;
    store.multicam.podcast.speakers.push(speaker);
    store.mark_modified();
    Some(id)
}

/// Bind a keystroke to a speaker's track for quick switching.
pub fn set_quick_switch_key(store: &mut EditorStore, key: impl Into<String>, speaker_id: Uuid) -> bool {
    let Some(track_id) = store
        .multicam
        .podcast
        .speaker(speaker_id)
        .map(|s| s.track_id)
    else {
        return false;
    };
    store
        .multicam
        .podcast
        .quick_switch_keys
        .insert(key.into(), track_id);
    store.mark_modified();
    true
}

/// Cut to a speaker's camera at `time` (default: the playhead).
///
/// No-op unless podcast mode is enabled and the speaker's track belongs
/// to a multicam group. Uses the configured switch transition duration;
/// 0.0 keeps a hard cut.
pub fn switch_to_speaker(store: &mut EditorStore, speaker_id: Uuid, time: Option<f64>) -> bool {
    if !store.multicam.podcast.enabled {
        return false;
    }
    let Some(track_id) = store
        .multicam
        .podcast
        .speaker(speaker_id)
        .map(|s| s.track_id)
    else {
        return false;
    };
    switch_to_track(store, track_id, time)
}

/// Resolve a quick-switch keystroke and cut to that speaker's camera.
pub fn handle_quick_key(store: &mut EditorStore, key: &str, time: Option<f64>) -> bool {
    if !store.multicam.podcast.enabled {
        return false;
    }
    let Some(track_id) = store.multicam.podcast.track_for_key(key) else {
        return false;
    };
    switch_to_track(store, track_id, time)
}

fn switch_to_track(store: &mut EditorStore, track_id: Uuid, time: Option<f64>) -> bool {
    let Some((group_id, angle)) = store
        .multicam
        .group_of_track(track_id)
        .and_then(|g| g.angle_for_track(track_id).map(|a| (g.id, a)))
    else {
        return false;
    };
    let duration = store.multicam.podcast.switch_transition_duration.max(0.0);
    let transition = if duration > 0.0 {
        SwitchTransition::Fade
    } else {
        SwitchTransition::Cut
    };
    tracing::debug!(track_id = %track_id, angle, "Podcast switch");
    switch_angle_with_transition(store, group_id, angle, time, transition, duration)
}
