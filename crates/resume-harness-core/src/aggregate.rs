//! Multi-strategy aggregator.
//!
//! Runs every retrieval strategy whose trigger fires for a question, maps
//! each result to section identifiers, and ranks the pooled identifiers by
//! how often they occur. A failing strategy is logged and skipped, so
//! aggregation as a whole never fails.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::StrategyError;
use crate::intent::QuestionSignals;
use crate::models::ResumeDocument;
use crate::retrieval::{self, RetrievalResult};
use crate::section::{section_ids_of, SectionId};

/// Maximum number of ranked sections returned.
pub const DEFAULT_TOP_K: usize = 10;

/// One facet of the résumé the aggregator can query.
pub trait RetrievalStrategy: Send + Sync {
    /// Stable identifier, reported in [`StrategyOutcome`].
    fn name(&self) -> &str;

    /// Whether this strategy runs for a question with these signals.
    fn applies_to(&self, _signals: &QuestionSignals) -> bool {
        true
    }

    fn retrieve(&self, doc: &ResumeDocument, question: &str) -> Result<RetrievalResult, StrategyError>;
}

/// Free-text experience search over the full question.
pub struct ExperienceStrategy;

impl RetrievalStrategy for ExperienceStrategy {
    fn name(&self) -> &str {
        "search_experience"
    }

    fn retrieve(&self, doc: &ResumeDocument, question: &str) -> Result<RetrievalResult, StrategyError> {
        Ok(RetrievalResult::Experience(retrieval::search_experience(doc, question)))
    }
}

/// AI/ML bundle, only for questions mentioning AI or ML.
pub struct AiMlStrategy;

impl RetrievalStrategy for AiMlStrategy {
    fn name(&self) -> &str {
        "get_ai_ml_experience"
    }

    fn applies_to(&self, signals: &QuestionSignals) -> bool {
        signals.ai_ml
    }

    fn retrieve(&self, doc: &ResumeDocument, _question: &str) -> Result<RetrievalResult, StrategyError> {
        Ok(RetrievalResult::AiMl(retrieval::get_ai_ml_experience(doc)))
    }
}

/// Key metrics, only for questions about metrics, impact or revenue.
pub struct MetricsStrategy;

impl RetrievalStrategy for MetricsStrategy {
    fn name(&self) -> &str {
        "get_metrics_and_impact"
    }

    fn applies_to(&self, signals: &QuestionSignals) -> bool {
        signals.impact
    }

    fn retrieve(&self, doc: &ResumeDocument, _question: &str) -> Result<RetrievalResult, StrategyError> {
        Ok(RetrievalResult::Metrics(retrieval::get_metrics_and_impact(doc)))
    }
}

/// Skill search on the last whitespace-delimited token of the question.
pub struct SkillStrategy;

impl RetrievalStrategy for SkillStrategy {
    fn name(&self) -> &str {
        "search_by_skill"
    }

    fn retrieve(&self, doc: &ResumeDocument, question: &str) -> Result<RetrievalResult, StrategyError> {
        let token = question
            .split_whitespace()
            .last()
            .ok_or_else(|| StrategyError::new(self.name(), "question has no tokens"))?;
        Ok(RetrievalResult::Skills(retrieval::search_by_skill(doc, token)))
    }
}

/// A strategy that ran successfully, with its raw result.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub strategy: String,
    pub result: RetrievalResult,
}

#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// Ranked by frequency, at most `top_k` long.
    pub sections: Vec<SectionId>,
    pub latency: Duration,
    pub outcomes: Vec<StrategyOutcome>,
}

impl AggregateResult {
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }

    pub fn outcome(&self, strategy: &str) -> Option<&StrategyOutcome> {
        self.outcomes.iter().find(|o| o.strategy == strategy)
    }
}

pub struct Aggregator {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
    top_k: usize,
}

impl Aggregator {
    /// The four built-in strategies in their fixed order.
    pub fn standard() -> Self {
        Self::with_strategies(
            vec![
                Box::new(ExperienceStrategy),
                Box::new(AiMlStrategy),
                Box::new(MetricsStrategy),
                Box::new(SkillStrategy),
            ],
            DEFAULT_TOP_K,
        )
    }

    pub fn with_strategies(strategies: Vec<Box<dyn RetrievalStrategy>>, top_k: usize) -> Self {
        Self { strategies, top_k }
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn retrieve(&self, doc: &ResumeDocument, question: &str) -> AggregateResult {
        let start = Instant::now();
        let signals = QuestionSignals::from_question(question);

        let mut pools = Vec::new();
        let mut outcomes = Vec::new();

        for strategy in &self.strategies {
            if !strategy.applies_to(&signals) {
                continue;
            }
            match strategy.retrieve(doc, question) {
                Ok(result) => {
                    if result.is_empty() {
                        continue;
                    }
                    pools.push(section_ids_of(&result));
                    outcomes.push(StrategyOutcome {
                        strategy: strategy.name().to_string(),
                        result,
                    });
                }
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "retrieval strategy skipped");
                }
            }
        }

        let sections = rank_sections(pools, self.top_k);

        AggregateResult {
            sections,
            latency: start.elapsed(),
            outcomes,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pool identifiers, count occurrences, sort by count descending with
/// first-seen order breaking ties, and keep the top `k`.
pub fn rank_sections<I>(pools: I, k: usize) -> Vec<SectionId>
where
    I: IntoIterator<Item = Vec<SectionId>>,
{
    let mut counts: HashMap<SectionId, usize> = HashMap::new();
    let mut order: Vec<SectionId> = Vec::new();

    for id in pools.into_iter().flatten() {
        let count = counts.entry(id.clone()).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }

    // sort_by is stable, so equal counts keep first-seen order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(k);
    order
}
