//! Append-only user-visible warnings and errors.
//!
//! Precondition failures and async task errors land here as messages the
//! UI can display without a try/catch; the core only guarantees an
//! append-only, queryable log with an explicit clear.

use serde::{Deserialize, Serialize};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single user-visible notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNotice {
    pub severity: Severity,
    pub message: String,
    /// When the notice was recorded (ISO 8601).
    pub timestamp: String,
}

/// The append-only notice log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoticeLog {
    entries: Vec<UserNotice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Warning => tracing::warn!(%message, "User notice"),
            Severity::Error => tracing::error!(%message, "User notice"),
        }
        self.entries.push(UserNotice {
            severity,
            message,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn entries(&self) -> &[UserNotice] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &UserNotice> {
        self.entries
            .iter()
            .filter(|n| n.severity == Severity::Error)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
