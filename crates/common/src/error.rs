//! Error types shared across Cutaway crates.

use std::path::PathBuf;

/// Top-level error type for Cutaway operations.
#[derive(Debug, thiserror::Error)]
pub enum CutawayError {
    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Timeline error: {message}")]
    Timeline { message: String },

    #[error("Multicam error: {message}")]
    Multicam { message: String },

    #[error("Smart edit error: {message}")]
    SmartEdit { message: String },

    #[error("Media error: {message}")]
    Media { message: String },

    #[error("Transcription error: {message}")]
    Transcription { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CutawayError.
pub type CutawayResult<T> = Result<T, CutawayError>;

impl CutawayError {
    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline {
            message: msg.into(),
        }
    }

    pub fn multicam(msg: impl Into<String>) -> Self {
        Self::Multicam {
            message: msg.into(),
        }
    }

    pub fn smart_edit(msg: impl Into<String>) -> Self {
        Self::SmartEdit {
            message: msg.into(),
        }
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media {
            message: msg.into(),
        }
    }

    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
