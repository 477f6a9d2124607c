//! Document store: loading and validating the résumé.
//!
//! The document is loaded once at startup and shared read-only afterwards.
//! Loading fails fast when a required top-level field is absent, naming the
//! field, rather than surfacing a generic deserialization error.

use std::path::Path;

use serde_json::Value;

use crate::error::DocumentError;
use crate::models::{ExperienceEntry, ResumeDocument};

/// Top-level keys every résumé file must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["personal", "summary", "experience", "skills", "education"];

impl ResumeDocument {
    /// Read and validate a résumé JSON file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Validate required fields, then deserialize.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let obj = value.as_object().ok_or(DocumentError::NotAnObject)?;
        for field in REQUIRED_FIELDS {
            if !obj.contains_key(field) {
                return Err(DocumentError::MissingField(field));
            }
        }

        let doc: ResumeDocument = serde_json::from_value(value)?;

        for (index, entry) in doc.experience.iter().enumerate() {
            if entry.company.trim().is_empty() {
                return Err(DocumentError::InvalidEntry {
                    index,
                    field: "company",
                });
            }
            if entry.title.trim().is_empty() {
                return Err(DocumentError::InvalidEntry {
                    index,
                    field: "title",
                });
            }
        }

        Ok(doc)
    }

    /// The current (most recent) role.
    pub fn current_role(&self) -> Option<&ExperienceEntry> {
        self.experience.first()
    }

    /// The earliest role on record.
    pub fn earliest_role(&self) -> Option<&ExperienceEntry> {
        self.experience.last()
    }

    pub fn owner_name(&self) -> &str {
        &self.personal.name
    }
}
