//! Versioned project document for persistence.
//!
//! Projects persist as a JSON envelope `{ version, project, metadata }`.
//! The round-trip contract is exact: `from_json(to_json(p)) == p`, with
//! timestamps carried as ISO 8601 strings. A version mismatch is accepted
//! with a warning; there is no schema migration.

use serde::{Deserialize, Serialize};

use crate::project::Project;

/// Current document schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Application identifier written into document metadata.
pub const APPLICATION: &str = "cutaway";

/// Persistence envelope around a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Document schema version.
    pub version: String,

    /// The project payload.
    pub project: Project,

    /// Document bookkeeping.
    pub metadata: DocumentMeta,
}

/// Bookkeeping metadata stored next to the project payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// When this document was first written (ISO 8601).
    pub created: String,

    /// When this document was last written (ISO 8601).
    pub modified: String,

    /// Writing application name.
    pub application: String,

    /// Writing application version.
    pub app_version: String,
}

impl ProjectDocument {
    /// Wrap a project for persistence, stamping fresh metadata.
    pub fn new(project: Project) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: SCHEMA_VERSION.to_string(),
            metadata: DocumentMeta {
                created: project.created_at.clone(),
                modified: now,
                application: APPLICATION.to_string(),
                app_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            project,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a document from JSON.
    ///
    /// A schema version other than [`SCHEMA_VERSION`] is accepted with a
    /// warning — rejecting outright would strand user files.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: ProjectDocument = serde_json::from_str(json)?;
        if doc.version != SCHEMA_VERSION {
            tracing::warn!(
                found = %doc.version,
                expected = SCHEMA_VERSION,
                "Project document version mismatch, loading anyway"
            );
        }
        Ok(doc)
    }
}
