//! Question classification.
//!
//! Keyword checks on the lowercased question, computed once and shared by
//! the aggregator (which strategies to run) and the formatter (which
//! template to use). Matching is plain substring matching: `"ai"` also
//! fires on words like "detail".

use serde::Serialize;

const AI_ML_TERMS: &[&str] = &["ai", "ml"];
const IMPACT_TERMS: &[&str] = &["metric", "impact", "revenue"];
const EXPERIENCE_TERMS: &[&str] = &["experience", "companies"];
const SKILL_TERMS: &[&str] = &["skill"];

/// The formatting template a question calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionIntent {
    AiMl,
    Impact,
    Experience,
    Skill,
    General,
}

impl QuestionIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionIntent::AiMl => "ai_ml",
            QuestionIntent::Impact => "impact",
            QuestionIntent::Experience => "experience",
            QuestionIntent::Skill => "skill",
            QuestionIntent::General => "general",
        }
    }
}

/// Which keyword families a question mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionSignals {
    pub ai_ml: bool,
    pub impact: bool,
    pub experience: bool,
    pub skill: bool,
}

impl QuestionSignals {
    pub fn from_question(question: &str) -> Self {
        let q = question.to_lowercase();
        let any = |terms: &[&str]| terms.iter().any(|t| q.contains(t));
        Self {
            ai_ml: any(AI_ML_TERMS),
            impact: any(IMPACT_TERMS),
            experience: any(EXPERIENCE_TERMS),
            skill: any(SKILL_TERMS),
        }
    }

    /// Primary intent, first match wins: AI/ML, impact, experience, skill.
    pub fn intent(&self) -> QuestionIntent {
        if self.ai_ml {
            QuestionIntent::AiMl
        } else if self.impact {
            QuestionIntent::Impact
        } else if self.experience {
            QuestionIntent::Experience
        } else if self.skill {
            QuestionIntent::Skill
        } else {
            QuestionIntent::General
        }
    }
}

pub fn classify(question: &str) -> QuestionIntent {
    QuestionSignals::from_question(question).intent()
}
