//! Transcription backend interface.
//!
//! Speech-to-text inference is delegated to an external backend; the core
//! only consumes word-level timestamps and segment classifications. The
//! backend is invoked asynchronously with progress callbacks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cutaway_common::{CutawayError, CutawayResult};

use crate::media::AudioSamples;
use crate::task::{CancelToken, ProgressFn};

/// Configuration for a transcription job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionOptions {
    /// Language hint (ISO 639-1 code, e.g., "en").
    pub language: Option<String>,

    /// Whether to emit word-level timestamps.
    pub word_timestamps: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            language: Some("en".to_string()),
            word_timestamps: true,
        }
    }
}

/// Classification of a transcribed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSegmentKind {
    Speech,
    Silence,
    Noise,
    Music,
}

/// A single word with timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

/// A transcribed segment with timing and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Transcribed text (empty for non-speech segments).
    pub text: String,
    pub kind: TranscriptSegmentKind,
    /// Confidence score in `[0.0, 1.0]`, if available.
    pub confidence: Option<f64>,
    /// Word-level timestamps, when requested.
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

/// Result of a transcription job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Detected language.
    pub language: String,
    /// Transcribed segments, ordered by start time.
    pub segments: Vec<TranscriptSegment>,
    /// Total audio duration processed, in seconds.
    pub duration_secs: f64,
    /// Processing time in seconds.
    pub processing_time_secs: f64,
}

impl TranscriptionResult {
    /// Segments classified as speech.
    pub fn speech_segments(&self) -> impl Iterator<Item = &TranscriptSegment> {
        self.segments
            .iter()
            .filter(|s| s.kind == TranscriptSegmentKind::Speech)
    }
}

/// Interface to the external transcription backend.
///
/// Implementations run synchronously; use [`run_transcription`] to offload
/// onto the blocking pool with progress reporting.
pub trait TranscriptionBackend: Send + Sync {
    fn transcribe(
        &self,
        audio: &AudioSamples,
        options: &TranscriptionOptions,
        progress: Option<&ProgressFn>,
        cancel: &CancelToken,
    ) -> CutawayResult<TranscriptionResult>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Run a transcription job off the main task.
///
/// Cancellation is cooperative: the backend checks the token between
/// processing steps.
pub async fn run_transcription(
    backend: Arc<dyn TranscriptionBackend>,
    audio: AudioSamples,
    options: TranscriptionOptions,
    progress: Option<ProgressFn>,
    cancel: CancelToken,
) -> CutawayResult<TranscriptionResult> {
    tracing::info!(
        backend = backend.name(),
        duration_secs = audio.duration_secs(),
        "Starting transcription"
    );

    tokio::task::spawn_blocking(move || {
        backend.transcribe(&audio, &options, progress.as_ref(), &cancel)
    })
    .await
    .map_err(|e| CutawayError::transcription(format!("transcription task panicked: {e}")))?
}

/// Scripted backend for tests: returns a canned result, honoring
/// cancellation and emitting full progress.
pub struct ScriptedTranscription {
    result: TranscriptionResult,
}

impl ScriptedTranscription {
    pub fn new(result: TranscriptionResult) -> Self {
        Self { result }
    }
}

impl TranscriptionBackend for ScriptedTranscription {
    fn transcribe(
        &self,
        _audio: &AudioSamples,
        _options: &TranscriptionOptions,
        progress: Option<&ProgressFn>,
        cancel: &CancelToken,
    ) -> CutawayResult<TranscriptionResult> {
        cancel.check()?;
        crate::task::report_progress(progress, 100.0);
        Ok(self.result.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned_result() -> TranscriptionResult {
        TranscriptionResult {
            language: "en".to_string(),
            segments: vec![TranscriptSegment {
                start: 0.0,
                end: 2.0,
                text: "hello world".to_string(),
                kind: TranscriptSegmentKind::Speech,
                confidence: Some(0.95),
                words: vec![
                    TranscriptWord {
                        word: "hello".to_string(),
                        start: 0.0,
                        end: 0.8,
                    },
                    TranscriptWord {
                        word: "world".to_string(),
                        start: 1.0,
                        end: 1.6,
                    },
                ],
            }],
            duration_secs: 2.0,
            processing_time_secs: 0.1,
        }
    }

    #[tokio::test]
    async fn test_run_transcription() {
        let backend = Arc::new(ScriptedTranscription::new(canned_result()));
        let audio = AudioSamples::new(vec![0.0; 32000], 16000);

        let result = run_transcription(
            backend,
            audio,
            TranscriptionOptions::default(),
            None,
            CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].words.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let backend = Arc::new(ScriptedTranscription::new(canned_result()));
        let audio = AudioSamples::new(vec![0.0; 16000], 16000);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = run_transcription(
            backend,
            audio,
            TranscriptionOptions::default(),
            None,
            cancel,
        )
        .await;
        assert!(matches!(result, Err(CutawayError::Cancelled)));
    }

    #[test]
    fn test_speech_segment_filter() {
        let mut result = canned_result();
        result.segments.push(TranscriptSegment {
            start: 2.0,
            end: 3.0,
            text: String::new(),
            kind: TranscriptSegmentKind::Silence,
            confidence: None,
            words: vec![],
        });
        assert_eq!(result.speech_segments().count(), 1);
    }
}
