//! Section identifiers.
//!
//! A section identifier names a logical part of the résumé for citations and
//! retrieval scoring: `experience_<company>`, `skills_<category>`,
//! `key_metrics`, or the catch-all `resume`. Every component derives them
//! through [`section_id_of`], so the aggregator's ranking keys and the
//! formatter's citation tags always agree.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::retrieval::{CompanyLookup, ExperienceMatch, RetrievalResult, SkillMatch};

/// A derived key naming a logical résumé section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Loose match used when scoring against labelled sections: either id
    /// contains the other.
    pub fn loosely_matches(&self, other: &str) -> bool {
        other.contains(self.as_str()) || self.0.contains(other)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The entity a section identifier is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRef<'a> {
    Company(&'a str),
    SkillCategory(&'a str),
    KeyMetrics,
    Resume,
}

/// Lowercase and replace spaces with underscores. Idempotent.
pub fn normalize(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Derive the section identifier for an entity.
pub fn section_id_of(entity: SectionRef<'_>) -> SectionId {
    match entity {
        SectionRef::Company(company) => SectionId(format!("experience_{}", normalize(company))),
        SectionRef::SkillCategory(category) => SectionId(format!("skills_{}", normalize(category))),
        SectionRef::KeyMetrics => SectionId("key_metrics".to_string()),
        SectionRef::Resume => SectionId("resume".to_string()),
    }
}

/// Flatten a retrieval result into the sections it draws evidence from,
/// deduplicated in first-seen order.
pub fn section_ids_of(result: &RetrievalResult) -> Vec<SectionId> {
    let mut sections = Vec::new();

    match result {
        RetrievalResult::Experience(search) => {
            for m in &search.matches {
                let company = match m {
                    ExperienceMatch::Role { company, .. } => company,
                    ExperienceMatch::Achievement { company, .. } => company,
                };
                sections.push(section_id_of(SectionRef::Company(company)));
            }
        }
        RetrievalResult::AiMl(bundle) => {
            for a in &bundle.related_achievements {
                sections.push(section_id_of(SectionRef::Company(&a.company)));
            }
        }
        RetrievalResult::Metrics(metrics) => {
            if !metrics.is_empty() {
                sections.push(section_id_of(SectionRef::KeyMetrics));
            }
        }
        RetrievalResult::Skills(search) => {
            for m in &search.matches {
                let id = match m {
                    SkillMatch::Skill { category, .. } => section_id_of(SectionRef::SkillCategory(category)),
                    SkillMatch::Experience { company, .. } => section_id_of(SectionRef::Company(company)),
                };
                sections.push(id);
            }
        }
        RetrievalResult::Company(CompanyLookup::Found(detail)) => {
            sections.push(section_id_of(SectionRef::Company(&detail.company)));
        }
        RetrievalResult::Company(CompanyLookup::NotFound { .. }) => {}
        RetrievalResult::Raw(value) => collect_from_value(value, &mut sections),
    }

    dedup_in_order(sections)
}

/// Shape-based mapping for untyped results: `matches[].company`,
/// `matches[].category`, `related_achievements[].company`, metric groups,
/// and a top-level `company` + `title` pair.
fn collect_from_value(value: &Value, out: &mut Vec<SectionId>) {
    let Some(obj) = value.as_object() else {
        return;
    };

    if let Some(matches) = obj.get("matches").and_then(Value::as_array) {
        for m in matches {
            if let Some(company) = m.get("company").and_then(Value::as_str) {
                out.push(section_id_of(SectionRef::Company(company)));
            }
            if let Some(category) = m.get("category").and_then(Value::as_str) {
                out.push(section_id_of(SectionRef::SkillCategory(category)));
            }
        }
    }

    if let Some(related) = obj.get("related_achievements").and_then(Value::as_array) {
        for a in related {
            if let Some(company) = a.get("company").and_then(Value::as_str) {
                out.push(section_id_of(SectionRef::Company(company)));
            }
        }
    }

    if obj.contains_key("revenue_impact") || obj.contains_key("efficiency_gains") {
        out.push(section_id_of(SectionRef::KeyMetrics));
    }

    if obj.contains_key("title") {
        if let Some(company) = obj.get("company").and_then(Value::as_str) {
            out.push(section_id_of(SectionRef::Company(company)));
        }
    }
}

fn dedup_in_order(sections: Vec<SectionId>) -> Vec<SectionId> {
    let mut seen = std::collections::HashSet::new();
    sections
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
