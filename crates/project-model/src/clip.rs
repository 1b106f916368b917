//! Clip types: placed, trimmed references to source media on a track.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_common::TimeRange;

/// Opaque reference to a source media file. The core never interprets
/// the path; the media engine collaborator resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef(pub String);

impl SourceRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A clip placed on the timeline.
///
/// Timing invariants, maintained by every mutation:
/// - `end_time == start_time + duration`
/// - `duration == trim_end - trim_start`
/// - `trim_start < trim_end`, `duration > 0.0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier.
    pub id: Uuid,

    /// Human-readable name.
    pub name: String,

    /// Media-kind specific properties.
    #[serde(flatten)]
    pub kind: ClipKind,

    /// Source media reference (opaque to the core).
    pub source: SourceRef,

    /// Owning track. Exactly one track holds each clip.
    pub track_id: Uuid,

    /// Timeline position in seconds.
    pub start_time: f64,

    /// Timeline end, always `start_time + duration`.
    pub end_time: f64,

    /// Length in seconds, always `trim_end - trim_start`.
    pub duration: f64,

    /// Source-material in point in seconds.
    pub trim_start: f64,

    /// Source-material out point in seconds.
    pub trim_end: f64,

    /// Locked clips are skipped by batch edits.
    #[serde(default)]
    pub locked: bool,

    /// Muted clips produce no audio.
    #[serde(default)]
    pub muted: bool,

    /// Gain multiplier in `[0.0, 2.0]`, 1.0 = unity.
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Applied effects, in order.
    #[serde(default)]
    pub effects: Vec<Effect>,

    /// Optional transition into this clip.
    #[serde(default)]
    pub transition_in: Option<TransitionRef>,

    /// Optional transition out of this clip.
    #[serde(default)]
    pub transition_out: Option<TransitionRef>,
}

fn default_volume() -> f64 {
    1.0
}

/// Media-kind discriminant with per-kind properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipKind {
    Video(VideoProps),
    Audio(AudioProps),
}

impl ClipKind {
    pub fn is_video(&self) -> bool {
        matches!(self, ClipKind::Video(_))
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, ClipKind::Audio(_))
    }

    /// Whether this clip carries an audio stream.
    pub fn has_audio(&self) -> bool {
        match self {
            ClipKind::Audio(_) => true,
            ClipKind::Video(v) => v.has_audio,
        }
    }
}

/// Video-specific clip properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoProps {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub codec: String,
    pub has_audio: bool,
    #[serde(default)]
    pub transform: Transform,
}

/// Audio-specific clip properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioProps {
    pub channels: u32,
    pub sample_rate: u32,
    pub bit_rate: u32,
    /// Normalized amplitude peaks for waveform display.
    #[serde(default)]
    pub waveform: Vec<f32>,
    /// Gain adjustment in dB on top of `volume`.
    #[serde(default)]
    pub gain_db: f64,
}

/// 2D transform applied to video clips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

/// A transition at a clip boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRef {
    pub kind: TransitionKind,
    /// Duration in seconds.
    pub duration: f64,
}

/// Supported transition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    #[default]
    Cut,
    Fade,
    Dissolve,
}

/// A typed effect applied to a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: EffectKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Effect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            enabled: true,
        }
    }
}

/// Closed set of effect kinds with typed parameters.
///
/// Extensible effects go through `Custom`, whose values are restricted to a
/// small closed set of types so documents stay comparable and replayable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectKind {
    /// Variable playback speed over the clip.
    SpeedRamp { factor: f64 },
    /// Audio gain adjustment.
    VolumeAdjust { gain_db: f64 },
    /// Basic color correction.
    ColorCorrection {
        brightness: f64,
        contrast: f64,
        saturation: f64,
    },
    /// Rectangular crop in normalized coordinates.
    Crop { x: f64, y: f64, w: f64, h: f64 },
    /// Escape hatch for host-defined effects.
    Custom {
        name: String,
        params: std::collections::BTreeMap<String, EffectValue>,
    },
}

/// Value types allowed in custom effect parameter maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    Number(f64),
    Bool(bool),
    Text(String),
    NumberList(Vec<f64>),
}

impl Clip {
    /// Create a video clip covering `[0, duration)` of its source.
    pub fn video(
        name: impl Into<String>,
        source: SourceRef,
        track_id: Uuid,
        start_time: f64,
        duration: f64,
        props: VideoProps,
    ) -> Self {
        Self::with_kind(name, source, track_id, start_time, duration, ClipKind::Video(props))
    }

    /// Create an audio clip covering `[0, duration)` of its source.
    pub fn audio(
        name: impl Into<String>,
        source: SourceRef,
        track_id: Uuid,
        start_time: f64,
        duration: f64,
        props: AudioProps,
    ) -> Self {
        Self::with_kind(name, source, track_id, start_time, duration, ClipKind::Audio(props))
    }

    fn with_kind(
        name: impl Into<String>,
        source: SourceRef,
        track_id: Uuid,
        start_time: f64,
        duration: f64,
        kind: ClipKind,
    ) -> Self {
        let start_time = start_time.max(0.0);
        let duration = duration.max(0.0);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            source,
            track_id,
            start_time,
            end_time: start_time + duration,
            duration,
            trim_start: 0.0,
            trim_end: duration,
            locked: false,
            muted: false,
            volume: 1.0,
            effects: Vec::new(),
            transition_in: None,
            transition_out: None,
        }
    }

    /// Timeline coverage of this clip.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// Move the clip to a new timeline position, keeping duration.
    pub fn set_start_time(&mut self, start_time: f64) {
        self.start_time = start_time.max(0.0);
        self.end_time = self.start_time + self.duration;
    }

    /// Set new trim bounds and rederive duration and end time.
    ///
    /// This is the low-level primitive: it never shifts `start_time`.
    pub fn set_trim(&mut self, trim_start: f64, trim_end: f64) {
        self.trim_start = trim_start.max(0.0);
        self.trim_end = trim_end.max(self.trim_start);
        self.duration = self.trim_end - self.trim_start;
        self.end_time = self.start_time + self.duration;
    }

    /// Problems with this clip's timing invariants, empty when consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = vec![];
        if (self.end_time - (self.start_time + self.duration)).abs() > 1e-9 {
            problems.push(format!("clip {}: end_time != start_time + duration", self.id));
        }
        if (self.duration - (self.trim_end - self.trim_start)).abs() > 1e-9 {
            problems.push(format!("clip {}: duration != trim_end - trim_start", self.id));
        }
        if self.trim_start >= self.trim_end {
            problems.push(format!("clip {}: trim_start >= trim_end", self.id));
        }
        problems
    }
}
