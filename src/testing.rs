//! Fixtures for unit tests: the bundled sample résumé.

use std::sync::Arc;

use resume_harness_core::ResumeDocument;

use crate::analytics::QueryLog;
use crate::config::Config;
use crate::traits::ToolContext;

pub const SAMPLE_RESUME: &str = include_str!("../data/resume_data.json");

pub fn sample_document() -> ResumeDocument {
    ResumeDocument::from_json_str(SAMPLE_RESUME).expect("bundled sample resume must parse")
}

pub fn sample_context() -> ToolContext {
    ToolContext::new(
        Arc::new(Config::minimal()),
        Arc::new(sample_document()),
        Arc::new(QueryLog::new()),
    )
}
