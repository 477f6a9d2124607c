//! Résumé loading for the application layer.

use anyhow::{Context, Result};
use chrono::Datelike;

use resume_harness_core::ResumeDocument;

use crate::config::Config;

/// Load and validate the configured résumé. Fails fast, naming the file and
/// any missing top-level field.
pub fn load_document(config: &Config) -> Result<ResumeDocument> {
    let path = &config.resume.path;
    let doc = ResumeDocument::load(path)
        .with_context(|| format!("Failed to load resume: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        roles = doc.experience.len(),
        skill_categories = doc.skills.len(),
        "resume loaded"
    );
    Ok(doc)
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
