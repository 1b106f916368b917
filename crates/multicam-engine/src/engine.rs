//! Multicam group lifecycle and angle switching.

use uuid::Uuid;

use cutaway_editor_state::EditorStore;
use cutaway_project_model::{
    CameraSwitchEvent, MulticamAngle, MulticamGroup, SwitchTransition, SyncPoint, SyncPointKind,
    Track,
};

/// Display color for angle `index`, hues spaced 60 degrees apart.
pub fn angle_color(index: usize) -> String {
    hsl_to_hex((index as f64 * 60.0) % 360.0, 0.65, 0.55)
}

fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}

/// Create a multicam group from existing tracks.
///
/// One angle per track, camera numbers 1..N in the given order. Ids not
/// naming a project track are dropped. Member tracks are flagged as
/// multicam sources. The first group created becomes the active group.
/// Returns `None` without a project or when no given track exists.
pub fn create_multicam_group(
    store: &mut EditorStore,
    name: impl Into<String>,
    track_ids: &[Uuid],
) -> Option<Uuid> {
    let members: Vec<Uuid> = {
        let project = store.project()?;
        track_ids
            .iter()
            .copied()
            .filter(|id| project.track(*id).is_some())
            .collect()
    };
    if members.is_empty() {
        return None;
    }

    let group_id = Uuid::new_v4();
    let mut angles = Vec::with_capacity(members.len());
    for (i, track_id) in members.iter().enumerate() {
        let track_name = store
            .project()
            .and_then(|p| p.track(*track_id))
            .map(|t| t.name.clone())
            .unwrap_or_default();
        angles.push(MulticamAngle {
            id: Uuid::new_v4(),
            name: track_name,
            track_id: *track_id,
            camera_number: (i + 1) as u32,
            color: angle_color(i),
            thumbnail: None,
        });
        mark_track(store, *track_id, group_id, i);
    }

    let group = MulticamGroup {
        id: group_id,
        name: name.into(),
        track_ids: members,
        angles,
        active_angle: 0,
        sync_points: Vec::new(),
        switch_events: Vec::new(),
    };
    tracing::info!(group_id = %group_id, angles = group.angles.len(), "Created multicam group");
    store.multicam.groups.push(group);
    if store.multicam.active_group.is_none() {
        store.multicam.active_group = Some(group_id);
    }
    store.mark_modified();
    Some(group_id)
}

fn mark_track(store: &mut EditorStore, track_id: Uuid, group_id: Uuid, angle: usize) {
    if let Some(track) = store.project_mut().and_then(|p| p.track_mut(track_id)) {
        track.is_multicam_source = true;
        track.multicam_group_id = Some(group_id);
        track.camera_angle = Some(angle);
    }
}

/// Add a track as a new angle at the end of a group. No-op when the
/// track is missing, already a member, or the group does not exist.
pub fn add_track_to_group(store: &mut EditorStore, group_id: Uuid, track_id: Uuid) -> bool {
    if store.project().and_then(|p| p.track(track_id)).is_none() {
        return false;
    }
    let track_name = store
        .project()
        .and_then(|p| p.track(track_id))
        .map(|t| t.name.clone())
        .unwrap_or_default();

    let angle_index = {
        let Some(group) = store.multicam.group_mut(group_id) else {
            return false;
        };
        if group.contains_track(track_id) {
            return false;
        }
        let next_camera = group
            .angles
            .iter()
            .map(|a| a.camera_number)
            .max()
            .unwrap_or(0)
            + 1;
        let index = group.angles.len();
        group.track_ids.push(track_id);
        group.angles.push(MulticamAngle {
            id: Uuid::new_v4(),
            name: track_name,
            track_id,
            camera_number: next_camera,
            color: angle_color(index),
            thumbnail: None,
        });
        index
    };
    mark_track(store, track_id, group_id, angle_index);
    store.mark_modified();
    true
}

/// Remove a track from a group, clearing its multicam flags and
/// re-indexing the remaining angles. Camera numbers are kept.
pub fn remove_track_from_group(store: &mut EditorStore, group_id: Uuid, track_id: Uuid) -> bool {
    let remaining: Vec<Uuid> = {
        let Some(group) = store.multicam.group_mut(group_id) else {
            return false;
        };
        let Some(pos) = group.angles.iter().position(|a| a.track_id == track_id) else {
            return false;
        };
        group.angles.remove(pos);
        group.track_ids.retain(|id| *id != track_id);
        if group.active_angle >= group.angles.len() {
            group.active_angle = 0;
        }
        group.track_ids.clone()
    };

    if let Some(track) = store.project_mut().and_then(|p| p.track_mut(track_id)) {
        track.clear_multicam_linkage();
    }
    for (i, id) in remaining.iter().enumerate() {
        if let Some(track) = store.project_mut().and_then(|p| p.track_mut(*id)) {
            track.camera_angle = Some(i);
        }
    }
    store.mark_modified();
    true
}

/// Switch the active angle, recording the switch in the group's log.
///
/// `time` defaults to the playhead. The event carries the previous
/// active angle as `from_angle` and a hard cut. Out-of-range angles and
/// missing groups are a no-op.
pub fn switch_angle(
    store: &mut EditorStore,
    group_id: Uuid,
    angle: usize,
    time: Option<f64>,
) -> bool {
    switch_angle_with_transition(store, group_id, angle, time, SwitchTransition::Cut, 0.0)
}

/// Switch the active angle with an explicit transition.
pub fn switch_angle_with_transition(
    store: &mut EditorStore,
    group_id: Uuid,
    angle: usize,
    time: Option<f64>,
    transition: SwitchTransition,
    transition_duration: f64,
) -> bool {
    let time = time.unwrap_or(store.playhead);
    let Some(group) = store.multicam.group_mut(group_id) else {
        return false;
    };
    if angle >= group.angles.len() {
        return false;
    }
    let from = group.active_angle;
    group.switch_events.push(CameraSwitchEvent {
        id: Uuid::new_v4(),
        time,
        from_angle: from,
        to_angle: angle,
        transition,
        transition_duration: transition_duration.max(0.0),
    });
    group.sort_switch_events();
    group.active_angle = angle;
    tracing::debug!(group_id = %group_id, from, to = angle, time, "Switched angle");
    store.mark_modified();
    true
}

/// Record a manual sync point, keeping the list sorted by time.
pub fn add_sync_point(
    store: &mut EditorStore,
    group_id: Uuid,
    time: f64,
    offsets: std::collections::BTreeMap<Uuid, f64>,
) -> Option<Uuid> {
    let group = store.multicam.group_mut(group_id)?;
    let point = SyncPoint {
        id: Uuid::new_v4(),
        time,
        offsets,
        kind: SyncPointKind::Manual,
        confidence: None,
    };
    let id = point.id;
    group.sync_points.push(point);
    group.sort_sync_points();
    store.mark_modified();
    Some(id)
}

/// Structural problems in a group relative to the project's tracks.
pub fn validate_group(group: &MulticamGroup, tracks: &[Track]) -> Vec<String> {
    let mut problems = vec![];

    if group.angles.len() != group.track_ids.len() {
        problems.push(format!(
            "group {}: {} angles for {} tracks",
            group.id,
            group.angles.len(),
            group.track_ids.len()
        ));
    }
    for track_id in &group.track_ids {
        if !tracks.iter().any(|t| t.id == *track_id) {
            problems.push(format!("group {}: missing track {}", group.id, track_id));
        }
    }
    let mut numbers: Vec<u32> = group.angles.iter().map(|a| a.camera_number).collect();
    numbers.sort_unstable();
    numbers.dedup();
    if numbers.len() != group.angles.len() {
        problems.push(format!("group {}: duplicate camera numbers", group.id));
    }
    if !group.angles.is_empty() && group.active_angle >= group.angles.len() {
        problems.push(format!(
            "group {}: active angle {} out of range",
            group.id, group.active_angle
        ));
    }

    problems
}
