//! Media engine interface: probing and audio decode.
//!
//! The core never touches codecs. Any implementation (native decoder
//! bindings, a subprocess, a library call) satisfies the contract as long
//! as it is deterministic for a given input.

use std::collections::HashMap;
use std::sync::Mutex;

use cutaway_common::{CutawayError, CutawayResult};
use cutaway_project_model::SourceRef;

/// Basic probing metadata for a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMetadata {
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Video dimensions, absent for audio-only sources.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Video frame rate, absent for audio-only sources.
    pub frame_rate: Option<f64>,
    /// Audio channel count, 0 when the source has no audio.
    pub channels: u32,
    /// Audio sample rate, 0 when the source has no audio.
    pub sample_rate: u32,
}

/// Decoded mono audio samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples {
    /// Interleaved-downmixed mono samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioSamples {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Interface to the external media engine.
pub trait MediaEngine: Send + Sync {
    /// Probe a source file for basic metadata.
    fn probe(&self, source: &SourceRef) -> CutawayResult<MediaMetadata>;

    /// Decode the full audio stream of a source as mono samples.
    fn decode_audio(&self, source: &SourceRef) -> CutawayResult<AudioSamples>;

    /// Read embedded timecode metadata, `None` when the source has none.
    fn read_timecode(&self, source: &SourceRef) -> CutawayResult<Option<f64>>;

    /// Engine name for diagnostics.
    fn name(&self) -> &str;
}

/// In-memory media engine for tests and headless use.
///
/// Sources are registered up front; probing or decoding an unregistered
/// source fails with a media error.
#[derive(Default)]
pub struct NullMediaEngine {
    entries: Mutex<HashMap<String, NullEntry>>,
}

struct NullEntry {
    metadata: MediaMetadata,
    audio: Option<AudioSamples>,
    timecode: Option<f64>,
}

impl NullMediaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an audio-only source from raw samples.
    pub fn register_audio(&self, source: &SourceRef, samples: Vec<f32>, sample_rate: u32) {
        let audio = AudioSamples::new(samples, sample_rate);
        let metadata = MediaMetadata {
            duration_secs: audio.duration_secs(),
            width: None,
            height: None,
            frame_rate: None,
            channels: 1,
            sample_rate,
        };
        self.entries.lock().unwrap().insert(
            source.as_str().to_string(),
            NullEntry {
                metadata,
                audio: Some(audio),
                timecode: None,
            },
        );
    }

    /// Register a source with explicit metadata and optional timecode.
    pub fn register(
        &self,
        source: &SourceRef,
        metadata: MediaMetadata,
        audio: Option<AudioSamples>,
        timecode: Option<f64>,
    ) {
        self.entries.lock().unwrap().insert(
            source.as_str().to_string(),
            NullEntry {
                metadata,
                audio,
                timecode,
            },
        );
    }
}

impl MediaEngine for NullMediaEngine {
    fn probe(&self, source: &SourceRef) -> CutawayResult<MediaMetadata> {
        self.entries
            .lock()
            .unwrap()
            .get(source.as_str())
            .map(|e| e.metadata.clone())
            .ok_or_else(|| CutawayError::media(format!("unknown source: {}", source.as_str())))
    }

    fn decode_audio(&self, source: &SourceRef) -> CutawayResult<AudioSamples> {
        self.entries
            .lock()
            .unwrap()
            .get(source.as_str())
            .and_then(|e| e.audio.clone())
            .ok_or_else(|| {
                CutawayError::media(format!("no audio stream in source: {}", source.as_str()))
            })
    }

    fn read_timecode(&self, source: &SourceRef) -> CutawayResult<Option<f64>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(source.as_str())
            .and_then(|e| e.timecode))
    }

    fn name(&self) -> &str {
        "null"
    }
}
