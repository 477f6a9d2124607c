//! Retrieval strategies.
//!
//! Each strategy is a pure function over the [`ResumeDocument`] that scans
//! one facet of it. Matching is case-insensitive substring matching and
//! results come back in document order, unranked.

use serde::Serialize;
use serde_json::Value;

use crate::models::{Achievement, KeyMetrics, ResumeDocument};

/// Achievement tags that mark AI/ML work.
pub const AI_TAGS: &[&str] = &["AI/ML", "AI", "automation", "ML"];

// ═══════════════════════════════════════════════════════════════════════
// Result shapes
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExperienceSearch {
    pub query: String,
    pub results_count: usize,
    pub matches: Vec<ExperienceMatch>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "match_type", rename_all = "snake_case")]
pub enum ExperienceMatch {
    Role {
        company: String,
        title: String,
        duration: String,
    },
    Achievement {
        company: String,
        title: String,
        achievement: String,
        metrics: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AiAchievement {
    pub company: String,
    pub role: String,
    pub achievement: String,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AiMlBundle {
    pub models_built: Vec<String>,
    pub tools_used: Vec<String>,
    pub initiatives_led: Vec<String>,
    pub design_patterns: Vec<String>,
    pub related_achievements: Vec<AiAchievement>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkillSearch {
    pub query: String,
    pub matches: Vec<SkillMatch>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillMatch {
    Skill {
        category: String,
        skill: String,
    },
    Experience {
        company: String,
        achievement: String,
        tags: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompanyDetail {
    pub company: String,
    pub title: String,
    pub location: String,
    pub duration: String,
    pub achievements: Vec<Achievement>,
    pub total_achievements: usize,
}

/// A company lookup either finds one entry or reports an `error` field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CompanyLookup {
    Found(CompanyDetail),
    NotFound { error: String },
}

impl CompanyLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, CompanyLookup::Found(_))
    }
}

/// Any value a retrieval strategy can produce.
///
/// `Raw` carries arbitrary JSON for callers that hand the formatter data
/// that did not come from one of the strategies here.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RetrievalResult {
    Experience(ExperienceSearch),
    AiMl(AiMlBundle),
    Metrics(KeyMetrics),
    Skills(SkillSearch),
    Company(CompanyLookup),
    Raw(Value),
}

impl RetrievalResult {
    /// The JSON shape the formatter templates read from.
    pub fn to_value(&self) -> Value {
        match self {
            RetrievalResult::Raw(v) => v.clone(),
            other => serde_json::to_value(other).unwrap_or(Value::Null),
        }
    }

    /// True when there is nothing at all to format: null, `{}`, `[]`, `""`,
    /// `false`, or zero.
    pub fn is_empty(&self) -> bool {
        match self {
            RetrievalResult::Raw(v) => !is_truthy(v),
            _ => false,
        }
    }

    /// True when the result carries actual résumé content rather than an
    /// empty match list or a not-found marker.
    pub fn has_evidence(&self) -> bool {
        match self {
            RetrievalResult::Experience(s) => !s.matches.is_empty(),
            RetrievalResult::AiMl(b) => {
                !(b.models_built.is_empty()
                    && b.tools_used.is_empty()
                    && b.initiatives_led.is_empty()
                    && b.design_patterns.is_empty()
                    && b.related_achievements.is_empty())
            }
            RetrievalResult::Metrics(m) => !m.is_empty(),
            RetrievalResult::Skills(s) => !s.matches.is_empty(),
            RetrievalResult::Company(c) => c.is_found(),
            RetrievalResult::Raw(v) => is_truthy(v),
        }
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Strategies
// ═══════════════════════════════════════════════════════════════════════

/// Free-text search over company, title, and achievement descriptions.
///
/// A role hit and several achievement hits for the same company are all
/// reported separately.
pub fn search_experience(doc: &ResumeDocument, query: &str) -> ExperienceSearch {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();

    for exp in &doc.experience {
        if exp.company.to_lowercase().contains(&needle) || exp.title.to_lowercase().contains(&needle) {
            matches.push(ExperienceMatch::Role {
                company: exp.company.clone(),
                title: exp.title.clone(),
                duration: exp.duration.clone(),
            });
        }

        for achievement in &exp.achievements {
            if achievement.description.to_lowercase().contains(&needle) {
                matches.push(ExperienceMatch::Achievement {
                    company: exp.company.clone(),
                    title: exp.title.clone(),
                    achievement: achievement.description.clone(),
                    metrics: achievement.metrics.clone(),
                });
            }
        }
    }

    ExperienceSearch {
        query: query.to_string(),
        results_count: matches.len(),
        matches,
    }
}

/// The AI experience bundle plus every achievement tagged as AI/ML work.
pub fn get_ai_ml_experience(doc: &ResumeDocument) -> AiMlBundle {
    let related_achievements = doc
        .experience
        .iter()
        .flat_map(|exp| {
            exp.achievements
                .iter()
                .filter(|a| a.tags.iter().any(|t| AI_TAGS.contains(&t.as_str())))
                .map(move |a| AiAchievement {
                    company: exp.company.clone(),
                    role: exp.title.clone(),
                    achievement: a.description.clone(),
                    metrics: a.metrics.clone(),
                })
        })
        .collect();

    let ai = &doc.ai_experience;
    AiMlBundle {
        models_built: ai.models_built.clone(),
        tools_used: ai.tools_used.clone(),
        initiatives_led: ai.initiatives_led.clone(),
        design_patterns: ai.design_patterns.clone(),
        related_achievements,
    }
}

pub fn get_metrics_and_impact(doc: &ResumeDocument) -> KeyMetrics {
    doc.key_metrics.clone()
}

/// Substring search over every skill (categories first) and then every
/// achievement tag.
pub fn search_by_skill(doc: &ResumeDocument, skill: &str) -> SkillSearch {
    let needle = skill.to_lowercase();
    let mut matches = Vec::new();

    for (category, skills) in doc.skills.iter() {
        for s in skills {
            if s.to_lowercase().contains(&needle) {
                matches.push(SkillMatch::Skill {
                    category: category.to_string(),
                    skill: s.clone(),
                });
            }
        }
    }

    for exp in &doc.experience {
        for achievement in &exp.achievements {
            if achievement.tags.iter().any(|t| t.to_lowercase().contains(&needle)) {
                matches.push(SkillMatch::Experience {
                    company: exp.company.clone(),
                    achievement: achievement.description.clone(),
                    tags: achievement.tags.clone(),
                });
            }
        }
    }

    SkillSearch {
        query: skill.to_string(),
        count: matches.len(),
        matches,
    }
}

/// Detail for the first entry whose company contains `company`.
pub fn get_company_details(doc: &ResumeDocument, company: &str) -> CompanyLookup {
    let needle = company.to_lowercase();

    doc.experience
        .iter()
        .find(|exp| exp.company.to_lowercase().contains(&needle))
        .map(|exp| {
            CompanyLookup::Found(CompanyDetail {
                company: exp.company.clone(),
                title: exp.title.clone(),
                location: exp.location.clone(),
                duration: exp.duration.clone(),
                achievements: exp.achievements.clone(),
                total_achievements: exp.achievements.len(),
            })
        })
        .unwrap_or_else(|| CompanyLookup::NotFound {
            error: format!("No experience found at company: {}", company),
        })
}
