//! Energy-based silence detection.
//!
//! The detector walks fixed 100 ms RMS windows over a mono buffer and
//! accumulates consecutive sub-threshold windows into segments. A
//! secondary, ten-times-tighter threshold separates true silence from
//! merely quiet audio.

use serde::{Deserialize, Serialize};

/// Window length for RMS analysis, in seconds.
const WINDOW_SECS: f64 = 0.1;

/// Options for [`detect_silence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceOptions {
    /// Amplitude threshold in dBFS below which a window counts as quiet.
    pub threshold_db: f64,
    /// Minimum run length, in seconds, for a segment to be reported.
    pub min_duration: f64,
    /// Detection sensitivity in `[0.0, 1.0]`; only affects the reported
    /// confidence, not which segments are found.
    pub sensitivity: f64,
}

impl Default for SilenceOptions {
    fn default() -> Self {
        Self {
            threshold_db: -40.0,
            min_duration: 0.5,
            sensitivity: 0.5,
        }
    }
}

/// Segment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SilenceSegmentKind {
    /// Effectively no signal.
    Silence,
    /// Below the threshold but with measurable content.
    LowVolume,
}

/// A detected quiet span, in buffer-local seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceSegment {
    pub start: f64,
    pub end: f64,
    pub kind: SilenceSegmentKind,
    /// Heuristic score derived from the configured sensitivity, not a
    /// measured statistic.
    pub confidence: f64,
}

impl SilenceSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Detect quiet spans of at least `min_duration` seconds.
///
/// A buffer that is quiet throughout yields exactly one segment
/// covering the whole duration. A run still open at end-of-buffer is
/// flushed.
pub fn detect_silence(
    samples: &[f32],
    sample_rate: u32,
    options: &SilenceOptions,
) -> Vec<SilenceSegment> {
    if samples.is_empty() || sample_rate == 0 {
        return Vec::new();
    }
    let threshold = 10f64.powf(options.threshold_db / 20.0);
    let silence_threshold = threshold / 10.0;
    let window = ((sample_rate as f64 * WINDOW_SECS) as usize).max(1);
    let total_duration = samples.len() as f64 / sample_rate as f64;
    let confidence = segment_confidence(options.sensitivity);

    let mut segments = Vec::new();
    let mut run_start: Option<f64> = None;
    let mut run_peak = 0f64;

    for (i, chunk) in samples.chunks(window).enumerate() {
        let energy: f64 = chunk.iter().map(|s| (*s as f64).powi(2)).sum();
        let rms = (energy / chunk.len() as f64).sqrt();
        let window_start = i as f64 * WINDOW_SECS;

        if rms < threshold {
            if run_start.is_none() {
                run_start = Some(window_start);
                run_peak = 0.0;
            }
            run_peak = run_peak.max(rms);
        } else if let Some(start) = run_start.take() {
            push_run(
                &mut segments,
                start,
                window_start,
                run_peak,
                silence_threshold,
                options.min_duration,
                confidence,
            );
        }
    }
    // Trailing open run flushes at end-of-buffer.
    if let Some(start) = run_start {
        push_run(
            &mut segments,
            start,
            total_duration,
            run_peak,
            silence_threshold,
            options.min_duration,
            confidence,
        );
    }
    tracing::debug!(segments = segments.len(), total_duration, "Silence detection finished");
    segments
}

fn push_run(
    segments: &mut Vec<SilenceSegment>,
    start: f64,
    end: f64,
    peak_rms: f64,
    silence_threshold: f64,
    min_duration: f64,
    confidence: f64,
) {
    if end - start < min_duration {
        return;
    }
    let kind = if peak_rms < silence_threshold {
        SilenceSegmentKind::Silence
    } else {
        SilenceSegmentKind::LowVolume
    };
    segments.push(SilenceSegment {
        start,
        end,
        kind,
        confidence,
    });
}

/// Heuristic confidence, monotonically increasing in sensitivity.
fn segment_confidence(sensitivity: f64) -> f64 {
    (0.5 + 0.5 * sensitivity.clamp(0.0, 1.0)).min(1.0)
}
