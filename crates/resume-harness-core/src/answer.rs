//! End-to-end question answering: aggregate, pick the result that fits the
//! question's intent, format it.

use serde::Serialize;

use crate::aggregate::{AggregateResult, Aggregator};
use crate::error::FormatError;
use crate::format::{AnswerFormatter, FormattedAnswer};
use crate::intent::{QuestionIntent, QuestionSignals};
use crate::models::ResumeDocument;
use crate::retrieval::RetrievalResult;
use crate::section::SectionId;

#[derive(Debug, Clone, Serialize)]
pub struct AnswerReport {
    pub question: String,
    pub intent: QuestionIntent,
    pub answer: FormattedAnswer,
    /// Ranked sections from the aggregator.
    pub sections: Vec<SectionId>,
    /// Strategy whose result was formatted, if any.
    pub source: Option<String>,
    pub latency_ms: f64,
}

/// Strategy whose output the template for `intent` reads.
fn preferred_strategy(intent: QuestionIntent) -> Option<&'static str> {
    match intent {
        QuestionIntent::AiMl => Some("get_ai_ml_experience"),
        QuestionIntent::Impact => Some("get_metrics_and_impact"),
        QuestionIntent::Experience => Some("search_experience"),
        QuestionIntent::Skill => Some("search_by_skill"),
        QuestionIntent::General => None,
    }
}

/// The intent's own strategy when it found evidence, else the first
/// strategy that did.
fn select_evidence(aggregate: &AggregateResult, intent: QuestionIntent) -> Option<(&str, &RetrievalResult)> {
    preferred_strategy(intent)
        .and_then(|name| aggregate.outcome(name))
        .filter(|o| o.result.has_evidence())
        .or_else(|| aggregate.outcomes.iter().find(|o| o.result.has_evidence()))
        .map(|o| (o.strategy.as_str(), &o.result))
}

pub fn answer_question(
    doc: &ResumeDocument,
    aggregator: &Aggregator,
    formatter: &AnswerFormatter,
    question: &str,
) -> Result<AnswerReport, FormatError> {
    let intent = QuestionSignals::from_question(question).intent();
    let aggregate = aggregator.retrieve(doc, question);

    let selected = select_evidence(&aggregate, intent);
    let answer = formatter.format_as(intent, selected.map(|(_, result)| result))?;

    Ok(AnswerReport {
        question: question.to_string(),
        intent,
        answer,
        source: selected.map(|(name, _)| name.to_string()),
        latency_ms: aggregate.latency_ms(),
        sections: aggregate.sections,
    })
}
