//! Project metadata and top-level container types.
//!
//! A project ties together the timeline (tracks and clips), markers, and
//! export configuration. It is owned exclusively by the editor store:
//! replaced wholesale on load, mutated in place otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::track::{Track, TrackKind};

/// Top-level project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,

    /// Human-readable project name.
    pub name: String,

    /// Schema version.
    pub version: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Canvas and timing settings.
    pub settings: ProjectSettings,

    /// Ordered timeline tracks.
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Timeline markers, kept sorted by time.
    #[serde(default)]
    pub markers: Vec<Marker>,

    /// Export configuration.
    pub export: ExportSettings,

    /// Free-form string metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Canvas and timing settings for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Canvas resolution in pixels.
    pub width: u32,
    pub height: u32,

    /// Timeline frame rate.
    pub frame_rate: f64,

    /// Audio sample rate.
    pub sample_rate: u32,

    /// Total timeline duration in seconds.
    pub duration: f64,

    /// Canvas background color as hex string.
    #[serde(default = "default_background")]
    pub background_color: String,
}

fn default_background() -> String {
    "#000000".to_string()
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: 30.0,
            sample_rate: 48000,
            duration: 0.0,
            background_color: default_background(),
        }
    }
}

/// A named point of interest on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    /// Timeline position in seconds.
    pub time: f64,
    pub name: String,
    /// Display color as hex string.
    pub color: String,
    pub kind: MarkerKind,
}

/// Marker classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Chapter,
    Edit,
    Custom,
}

impl Marker {
    pub fn new(time: f64, name: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            time: time.max(0.0),
            name: name.into(),
            color: "#e8c547".to_string(),
            kind,
        }
    }
}

/// Export configuration stored with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Output container/codec preset.
    pub format: ExportFormat,

    /// Output resolution.
    pub width: u32,
    pub height: u32,

    /// Output frame rate.
    pub frame_rate: f64,

    /// Video bitrate in kbps (0 = auto).
    pub video_bitrate_kbps: u32,

    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
}

/// Output video format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[serde(rename = "mp4-h264")]
    Mp4H264,
    #[serde(rename = "mp4-h265")]
    Mp4H265,
    Webm,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Mp4H264,
            width: 1920,
            height: 1080,
            frame_rate: 30.0,
            video_bitrate_kbps: 8000,
            audio_bitrate_kbps: 192,
        }
    }
}

impl Project {
    /// Create a new empty project from settings.
    pub fn new(name: impl Into<String>, settings: ProjectSettings) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let export = ExportSettings {
            width: settings.width,
            height: settings.height,
            frame_rate: settings.frame_rate,
            ..ExportSettings::default()
        };
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version: crate::document::SCHEMA_VERSION.to_string(),
            created_at: now.clone(),
            modified_at: now,
            settings,
            tracks: Vec::new(),
            markers: Vec::new(),
            export,
            metadata: BTreeMap::new(),
        }
    }

    /// Update the modified timestamp to now.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }

    /// Find a track by id.
    pub fn track(&self, track_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Find a track by id, mutably.
    pub fn track_mut(&mut self, track_id: Uuid) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    /// Find the track holding a clip, scanning all tracks.
    pub fn track_of_clip(&self, clip_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.clip(clip_id).is_some())
    }

    /// Count tracks of the given kind, used for default track names.
    pub fn count_tracks(&self, kind: TrackKind) -> usize {
        self.tracks.iter().filter(|t| t.kind == kind).count()
    }

    /// Re-sort markers ascending by time.
    pub fn sort_markers(&mut self) {
        self.markers.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// End of the last clip across all tracks.
    pub fn content_duration(&self) -> f64 {
        self.tracks.iter().map(|t| t.duration()).fold(0.0, f64::max)
    }

    /// Validate structural invariants, returning human-readable problems.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = vec![];

        for track in &self.tracks {
            for clip in &track.clips {
                problems.extend(clip.invariant_violations());
                if clip.track_id != track.id {
                    problems.push(format!(
                        "clip {} on track {} records track_id {}",
                        clip.id, track.id, clip.track_id
                    ));
                }
            }
            let mut last_start = f64::NEG_INFINITY;
            for clip in &track.clips {
                if clip.start_time < last_start {
                    problems.push(format!("track {}: clips not sorted by start_time", track.id));
                    break;
                }
                last_start = clip.start_time;
            }
        }

        let mut last_time = f64::NEG_INFINITY;
        for marker in &self.markers {
            if marker.time < last_time {
                problems.push("markers not sorted by time".to_string());
                break;
            }
            last_time = marker.time;
        }

        problems
    }
}
