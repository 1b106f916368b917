//! Multicam data contracts: camera groups, angles, sync points, switch
//! events, and the podcast speaker mapping built on top of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A set of tracks treated as synchronized camera angles of one event.
///
/// Invariants: `angles.len() == track_ids.len()`, camera numbers unique
/// within the group, `active_angle` a valid index (or 0 when empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticamGroup {
    pub id: Uuid,
    pub name: String,

    /// Member tracks, in angle order.
    pub track_ids: Vec<Uuid>,

    /// One angle per member track.
    pub angles: Vec<MulticamAngle>,

    /// Index of the currently active angle.
    pub active_angle: usize,

    /// Alignment points, kept sorted by time.
    #[serde(default)]
    pub sync_points: Vec<SyncPoint>,

    /// Append-only switch log, kept sorted by time. Doubles as the
    /// "which angle at time T" oracle when scrubbing.
    #[serde(default)]
    pub switch_events: Vec<CameraSwitchEvent>,
}

/// One camera angle within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticamAngle {
    pub id: Uuid,
    pub name: String,
    pub track_id: Uuid,
    /// 1-based camera number, unique within the group.
    pub camera_number: u32,
    /// Display color as hex string.
    pub color: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A timestamp plus per-track offsets used to align group members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPoint {
    pub id: Uuid,
    /// Timeline position of the alignment point in seconds.
    pub time: f64,
    /// Offset in seconds per member track.
    pub offsets: BTreeMap<Uuid, f64>,
    pub kind: SyncPointKind,
    /// Analysis confidence in `[0.0, 1.0]`, when derived automatically.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// How a sync point was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPointKind {
    Audio,
    Timecode,
    Manual,
}

/// A recorded angle switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSwitchEvent {
    pub id: Uuid,
    /// Timeline position of the switch in seconds.
    pub time: f64,
    pub from_angle: usize,
    pub to_angle: usize,
    pub transition: SwitchTransition,
    /// Transition duration in seconds (0.0 for a hard cut).
    pub transition_duration: f64,
}

/// Transition style for an angle switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SwitchTransition {
    #[default]
    Cut,
    Fade,
    Dissolve,
}

impl MulticamGroup {
    /// The angle index for a member track, if present.
    pub fn angle_for_track(&self, track_id: Uuid) -> Option<usize> {
        self.angles.iter().position(|a| a.track_id == track_id)
    }

    /// Whether the group contains a track.
    pub fn contains_track(&self, track_id: Uuid) -> bool {
        self.track_ids.contains(&track_id)
    }

    /// The angle active at `time`, derived from the switch log.
    ///
    /// Before the first switch the answer is the first event's `from_angle`
    /// (the angle the program started on); with no events it is
    /// `active_angle`.
    pub fn angle_at(&self, time: f64) -> usize {
        let mut current = self
            .switch_events
            .first()
            .map(|e| e.from_angle)
            .unwrap_or(self.active_angle);
        for event in &self.switch_events {
            if event.time <= time {
                current = event.to_angle;
            } else {
                break;
            }
        }
        current
    }

    /// Re-sort sync points ascending by time.
    pub fn sort_sync_points(&mut self) {
        self.sync_points.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Re-sort switch events ascending by time.
    pub fn sort_switch_events(&mut self) {
        self.switch_events.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

/// Podcast mode: speakers mapped onto multicam angles with quick-switch keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PodcastModeSettings {
    pub enabled: bool,

    #[serde(default)]
    pub speakers: Vec<Speaker>,

    /// Switch automatically on detected speech activity.
    #[serde(default)]
    pub auto_switch: bool,

    /// Transition duration applied to speaker switches, in seconds.
    #[serde(default)]
    pub switch_transition_duration: f64,

    /// Keystroke → track mapping for one-key switching.
    #[serde(default)]
    pub quick_switch_keys: BTreeMap<String, Uuid>,
}

/// A podcast participant bound to a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub track_id: Uuid,
    /// Display color as hex string.
    pub color: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub voice_profile: Option<String>,
}

impl PodcastModeSettings {
    /// Find a speaker by id.
    pub fn speaker(&self, speaker_id: Uuid) -> Option<&Speaker> {
        self.speakers.iter().find(|s| s.id == speaker_id)
    }

    /// Find the speaker bound to a track.
    pub fn speaker_for_track(&self, track_id: Uuid) -> Option<&Speaker> {
        self.speakers.iter().find(|s| s.track_id == track_id)
    }

    /// Resolve a quick-switch keystroke to its track.
    pub fn track_for_key(&self, key: &str) -> Option<Uuid> {
        self.quick_switch_keys.get(key).copied()
    }
}
