//! Export job tracking.
//!
//! The store owns at most one export job at a time. Rendering itself
//! happens elsewhere; this module models the job's lifecycle: stage,
//! progress, cancellation, and the terminal outcome shown to the user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_media_bridge::task::CancelToken;

/// Stage of an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportStage {
    #[default]
    Idle,
    Preparing,
    Rendering,
    Encoding,
    Finalizing,
    Complete,
    Failed,
    Cancelled,
}

impl ExportStage {
    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExportStage::Complete | ExportStage::Failed | ExportStage::Cancelled
        )
    }
}

/// The state of the current (or most recent) export job.
#[derive(Debug, Clone)]
pub struct ExportJobState {
    pub job_id: Uuid,
    /// Percent complete, 0-100.
    pub progress: f64,
    pub stage: ExportStage,
    /// Human-readable status line, or the failure message.
    pub message: String,
    /// Output path the job writes to.
    pub output_path: String,
    cancel: CancelToken,
}

impl ExportJobState {
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            progress: 0.0,
            stage: ExportStage::Preparing,
            message: "Preparing export".to_string(),
            output_path: output_path.into(),
            cancel: CancelToken::new(),
        }
    }

    /// The token the render task polls for cancellation.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Update progress and stage. Ignored once the job is terminal.
    pub fn update(&mut self, stage: ExportStage, progress: f64, message: impl Into<String>) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = stage;
        self.progress = progress.clamp(0.0, 100.0);
        self.message = message.into();
    }

    pub fn complete(&mut self) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = ExportStage::Complete;
        self.progress = 100.0;
        self.message = "Export complete".to_string();
        tracing::info!(job_id = %self.job_id, path = %self.output_path, "Export complete");
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = ExportStage::Failed;
        self.message = message.into();
        tracing::error!(job_id = %self.job_id, error = %self.message, "Export failed");
    }

    /// Request cancellation. The render task observes the token and the
    /// job transitions to `Cancelled` here.
    pub fn cancel(&mut self) {
        if self.stage.is_terminal() {
            return;
        }
        self.cancel.cancel();
        self.stage = ExportStage::Cancelled;
        self.message = "Export cancelled".to_string();
        tracing::info!(job_id = %self.job_id, "Export cancelled");
    }

    pub fn is_active(&self) -> bool {
        !self.stage.is_terminal()
    }
}
