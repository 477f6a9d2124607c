//! Offline evaluation harnesses.
//!
//! [`Evaluator`] replays a labelled question set through the [`Aggregator`]
//! and scores the ranked sections against each question's expected
//! sections: retrieval@k, reciprocal rank, and nearest-rank latency
//! percentiles. The formatter is not involved.
//!
//! [`KeywordEvaluator`] answers each case end to end and scores the
//! formatted text by the fraction of expected keywords it contains.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregate::Aggregator;
use crate::answer::answer_question;
use crate::error::EvalError;
use crate::format::AnswerFormatter;
use crate::models::ResumeDocument;
use crate::section::SectionId;

/// Retrieved sections kept per result for display.
const PREVIEW_SECTIONS: usize = 5;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvalQuestion {
    pub id: String,
    pub question: String,
    pub category: String,
    pub expected_sections: Vec<String>,
}

/// Target thresholds for the overall verdict. Rates are fractions in `0..=1`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct EvalCriteria {
    pub retrieval_at_1: f64,
    pub retrieval_at_3: f64,
    pub p50_latency_ms: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<EvalQuestion>,
    pub evaluation_criteria: EvalCriteria,
    /// Category id to display name.
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

impl QuestionSet {
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let text = std::fs::read_to_string(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, EvalError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories.get(id).map(String::as_str).unwrap_or(id)
    }
}

/// Rank-based scores for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankScore {
    /// 1-based rank of the first retrieved section matching any expected one.
    pub rank_of_first_match: Option<usize>,
    /// First matching rank of each expected section that was found.
    pub all_ranks: Vec<usize>,
    pub retrieval_at_1: bool,
    pub retrieval_at_3: bool,
    pub retrieval_at_5: bool,
    pub reciprocal_rank: f64,
}

/// Score retrieved sections against expected ones. Matching is loose: a
/// retrieved id matches when either id contains the other.
pub fn score_ranks(expected: &[String], retrieved: &[SectionId]) -> RankScore {
    let rank_of = |want: &str| {
        retrieved
            .iter()
            .position(|got| got.loosely_matches(want))
            .map(|i| i + 1)
    };

    let all_ranks: Vec<usize> = expected.iter().filter_map(|e| rank_of(e.as_str())).collect();
    let rank_of_first_match = all_ranks.iter().copied().min();
    let within = |k: usize| rank_of_first_match.is_some_and(|r| r <= k);

    RankScore {
        retrieval_at_1: within(1),
        retrieval_at_3: within(3),
        retrieval_at_5: within(5),
        reciprocal_rank: rank_of_first_match.map(|r| 1.0 / r as f64).unwrap_or(0.0),
        rank_of_first_match,
        all_ranks,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalResult {
    pub question_id: String,
    pub question: String,
    pub category: String,
    pub expected_sections: Vec<String>,
    /// Top retrieved sections, for display.
    pub retrieved_sections: Vec<SectionId>,
    pub rank_of_first_match: Option<usize>,
    pub all_ranks: Vec<usize>,
    pub latency_ms: f64,
    /// Reciprocal rank.
    pub score: f64,
    /// Found within the top 3.
    pub passed: bool,
    pub has_citations: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EvalMetrics {
    pub total_questions: usize,
    pub retrieval_at_1: f64,
    pub retrieval_at_3: f64,
    pub retrieval_at_5: f64,
    pub mean_reciprocal_rank: f64,
    pub p50_latency_ms: f64,
    pub p90_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub category_scores: BTreeMap<String, f64>,
    pub passed_questions: usize,
    pub pass_rate: f64,
}

impl EvalMetrics {
    pub fn from_results(results: &[EvalResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let n = results.len() as f64;
        let rate = |pred: &dyn Fn(&EvalResult) -> bool| results.iter().filter(|r| pred(r)).count() as f64 / n;
        let within = |k: usize| move |r: &EvalResult| r.rank_of_first_match.is_some_and(|rank| rank <= k);

        let mut latencies: Vec<f64> = results.iter().map(|r| r.latency_ms).collect();
        latencies.sort_by(f64::total_cmp);

        let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for r in results {
            by_category.entry(r.category.clone()).or_default().push(r.score);
        }
        let category_scores = by_category
            .into_iter()
            .map(|(category, scores)| {
                let mean = scores.iter().sum::<f64>() / scores.len() as f64;
                (category, mean)
            })
            .collect();

        let passed_questions = results.iter().filter(|r| r.passed).count();

        Self {
            total_questions: results.len(),
            retrieval_at_1: rate(&within(1)),
            retrieval_at_3: rate(&within(3)),
            retrieval_at_5: rate(&within(5)),
            mean_reciprocal_rank: results.iter().map(|r| r.score).sum::<f64>() / n,
            p50_latency_ms: percentile(&latencies, 0.50),
            p90_latency_ms: percentile(&latencies, 0.90),
            p99_latency_ms: percentile(&latencies, 0.99),
            category_scores,
            passed_questions,
            pass_rate: passed_questions as f64 / n,
        }
    }
}

/// Nearest-rank percentile of an ascending slice: the value at rank
/// `ceil(p * n)`, no interpolation. Zero for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Per-criterion outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub retrieval_at_1: bool,
    pub retrieval_at_3: bool,
    pub p50_latency: bool,
}

impl Verdict {
    pub fn judge(metrics: &EvalMetrics, criteria: &EvalCriteria) -> Self {
        Self {
            retrieval_at_1: metrics.retrieval_at_1 >= criteria.retrieval_at_1,
            retrieval_at_3: metrics.retrieval_at_3 >= criteria.retrieval_at_3,
            p50_latency: metrics.p50_latency_ms <= criteria.p50_latency_ms,
        }
    }

    pub fn all_met(&self) -> bool {
        self.retrieval_at_1 && self.retrieval_at_3 && self.p50_latency
    }
}

pub struct Evaluator<'a> {
    doc: &'a ResumeDocument,
    aggregator: &'a Aggregator,
}

impl<'a> Evaluator<'a> {
    pub fn new(doc: &'a ResumeDocument, aggregator: &'a Aggregator) -> Self {
        Self { doc, aggregator }
    }

    pub fn evaluate_question(&self, q: &EvalQuestion) -> EvalResult {
        let retrieved = self.aggregator.retrieve(self.doc, &q.question);
        let score = score_ranks(&q.expected_sections, &retrieved.sections);

        EvalResult {
            question_id: q.id.clone(),
            question: q.question.clone(),
            category: q.category.clone(),
            expected_sections: q.expected_sections.clone(),
            has_citations: !retrieved.sections.is_empty(),
            latency_ms: retrieved.latency_ms(),
            retrieved_sections: retrieved.sections.into_iter().take(PREVIEW_SECTIONS).collect(),
            rank_of_first_match: score.rank_of_first_match,
            all_ranks: score.all_ranks,
            score: score.reciprocal_rank,
            passed: score.retrieval_at_3,
        }
    }

    pub fn run(&self, set: &QuestionSet) -> EvalRun {
        self.run_with_progress(set, |_, _| {})
    }

    /// Run every question, calling `progress` with the 1-based index and
    /// result after each one.
    pub fn run_with_progress<F>(&self, set: &QuestionSet, mut progress: F) -> EvalRun
    where
        F: FnMut(usize, &EvalResult),
    {
        let mut results = Vec::with_capacity(set.questions.len());
        for (i, q) in set.questions.iter().enumerate() {
            let result = self.evaluate_question(q);
            progress(i + 1, &result);
            results.push(result);
        }

        let metrics = EvalMetrics::from_results(&results);
        let verdict = Verdict::judge(&metrics, &set.evaluation_criteria);
        tracing::info!(
            questions = metrics.total_questions,
            passed = metrics.passed_questions,
            criteria_met = verdict.all_met(),
            "evaluation finished"
        );

        EvalRun {
            results,
            metrics,
            verdict,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalRun {
    pub results: Vec<EvalResult>,
    pub metrics: EvalMetrics,
    pub verdict: Verdict,
}

impl EvalRun {
    /// `{timestamp, metrics, detailed_results}` as written by [`Self::save_results`].
    pub fn to_json(&self) -> serde_json::Value {
        let m = &self.metrics;
        json!({
            "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "metrics": {
                "retrieval_at_1": m.retrieval_at_1,
                "retrieval_at_3": m.retrieval_at_3,
                "retrieval_at_5": m.retrieval_at_5,
                "mrr": m.mean_reciprocal_rank,
                "p50_latency_ms": m.p50_latency_ms,
                "p90_latency_ms": m.p90_latency_ms,
                "p99_latency_ms": m.p99_latency_ms,
                "pass_rate": m.pass_rate,
                "category_scores": m.category_scores,
            },
            "detailed_results": self.results.iter().map(|r| json!({
                "question_id": r.question_id,
                "question": r.question,
                "passed": r.passed,
                "rank": r.rank_of_first_match,
                "all_ranks": r.all_ranks,
                "retrieved_sections": r.retrieved_sections,
                "latency_ms": r.latency_ms,
                "score": r.score,
                "has_citations": r.has_citations,
            })).collect::<Vec<_>>(),
        })
    }

    pub fn save_results(&self, path: &Path) -> Result<(), EvalError> {
        let text = serde_json::to_string_pretty(&self.to_json())?;
        std::fs::write(path, text).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Human-readable summary report.
    pub fn render_report(&self, set: &QuestionSet) -> String {
        let m = &self.metrics;
        let c = &set.evaluation_criteria;
        let mark = |ok: bool| if ok { "PASS" } else { "FAIL" };
        let pct = |x: f64| format!("{:.0}%", x * 100.0);

        let mut out = String::new();
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str("EVALUATION SUMMARY\n");
        out.push_str(&format!("{}\n\n", "=".repeat(60)));

        out.push_str(&format!(
            "Passed: {}/{} ({})\n\n",
            m.passed_questions,
            m.total_questions,
            pct(m.pass_rate)
        ));

        out.push_str("Retrieval:\n");
        out.push_str(&format!(
            "  Retrieval@1: {} {} (target: {})\n",
            pct(m.retrieval_at_1),
            mark(self.verdict.retrieval_at_1),
            pct(c.retrieval_at_1)
        ));
        out.push_str(&format!(
            "  Retrieval@3: {} {} (target: {})\n",
            pct(m.retrieval_at_3),
            mark(self.verdict.retrieval_at_3),
            pct(c.retrieval_at_3)
        ));
        out.push_str(&format!("  Retrieval@5: {}\n", pct(m.retrieval_at_5)));
        out.push_str(&format!("  MRR: {:.3}\n\n", m.mean_reciprocal_rank));

        out.push_str("Latency:\n");
        out.push_str(&format!(
            "  P50: {:.2}ms {} (target: <{}ms)\n",
            m.p50_latency_ms,
            mark(self.verdict.p50_latency),
            c.p50_latency_ms
        ));
        out.push_str(&format!("  P90: {:.2}ms\n", m.p90_latency_ms));
        out.push_str(&format!("  P99: {:.2}ms\n\n", m.p99_latency_ms));

        let mut categories: Vec<(&String, &f64)> = m.category_scores.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1));
        out.push_str("Categories:\n");
        for (category, score) in categories.into_iter().take(5) {
            out.push_str(&format!(
                "  {}: {:.2} - {}\n",
                category,
                score,
                set.category_name(category)
            ));
        }

        let failed: Vec<&EvalResult> = self.results.iter().filter(|r| !r.passed).collect();
        if !failed.is_empty() {
            out.push_str(&format!("\nFailed questions ({}):\n", failed.len()));
            for r in failed.iter().take(5) {
                let shown: Vec<&str> = r.retrieved_sections.iter().take(3).map(SectionId::as_str).collect();
                out.push_str(&format!("  - {}\n", preview(&r.question, 60)));
                out.push_str(&format!("    expected:  {:?}\n", r.expected_sections));
                out.push_str(&format!("    retrieved: {:?}\n", shown));
            }
        }

        out.push_str(&format!("\n{}\n", "=".repeat(60)));
        if self.verdict.all_met() {
            out.push_str("All evaluation criteria met\n");
        } else {
            out.push_str("Some criteria not met\n");
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Answer keyword checks
// ═══════════════════════════════════════════════════════════════════════

const DEFAULT_MIN_SCORE: f64 = 0.7;

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordCase {
    pub query: String,
    pub expected_keywords: Vec<String>,
    pub category: String,
    /// Fraction of keywords that must appear for the case to pass.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordSet {
    pub cases: Vec<KeywordCase>,
}

impl KeywordSet {
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let text = std::fs::read_to_string(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, EvalError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Fraction of `expected` found in `response` (case-insensitive substring),
/// with the found keywords in their listed order. No keywords scores zero.
pub fn keyword_score(response: &str, expected: &[String]) -> (f64, Vec<String>) {
    let haystack = response.to_lowercase();
    let found: Vec<String> = expected
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .cloned()
        .collect();

    let score = if expected.is_empty() {
        0.0
    } else {
        found.len() as f64 / expected.len() as f64
    };
    (score, found)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordResult {
    pub query: String,
    pub category: String,
    /// Rounded to two decimals; `passed` uses the exact value.
    pub score: f64,
    pub passed: bool,
    pub expected_keywords: Vec<String>,
    pub found_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,
    pub min_score_required: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeywordResult {
    fn scored(case: &KeywordCase, response: &str, response_time_ms: f64) -> Self {
        let (score, found) = keyword_score(response, &case.expected_keywords);
        let missing = case
            .expected_keywords
            .iter()
            .filter(|k| !found.contains(k))
            .cloned()
            .collect();
        Self {
            query: case.query.clone(),
            category: case.category.clone(),
            score: round2(score),
            passed: score >= case.min_score,
            expected_keywords: case.expected_keywords.clone(),
            found_keywords: found,
            missing_keywords: missing,
            response_time_ms: Some(response_time_ms),
            min_score_required: case.min_score,
            error: None,
        }
    }

    fn failed(case: &KeywordCase, error: String) -> Self {
        Self {
            query: case.query.clone(),
            category: case.category.clone(),
            score: 0.0,
            passed: false,
            expected_keywords: case.expected_keywords.clone(),
            found_keywords: Vec::new(),
            missing_keywords: case.expected_keywords.clone(),
            response_time_ms: None,
            min_score_required: case.min_score,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordSummary {
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    /// Mean over cases that produced an answer.
    pub average_response_time_ms: f64,
    /// Mean score per category. Failed answers are excluded.
    pub category_scores: BTreeMap<String, f64>,
    pub detailed_results: Vec<KeywordResult>,
}

impl KeywordSummary {
    pub fn from_results(results: Vec<KeywordResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();

        let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for r in results.iter().filter(|r| r.error.is_none()) {
            by_category.entry(r.category.clone()).or_default().push(r.score);
        }
        let category_scores = by_category
            .into_iter()
            .map(|(category, scores)| (category, round2(scores.iter().sum::<f64>() / scores.len() as f64)))
            .collect();

        let times: Vec<f64> = results.iter().filter_map(|r| r.response_time_ms).collect();
        let average_response_time_ms = if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<f64>() / times.len() as f64
        };

        Self {
            total_tests: total,
            passed,
            failed: total - passed,
            pass_rate: if total == 0 { 0.0 } else { round2(passed as f64 / total as f64) },
            average_response_time_ms,
            category_scores,
            detailed_results: results,
        }
    }

    pub fn save_results(&self, path: &Path) -> Result<(), EvalError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn render_report(&self) -> String {
        let pct = |x: f64| format!("{:.0}%", x * 100.0);

        let mut out = String::new();
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str("ANSWER KEYWORD SUMMARY\n");
        out.push_str(&format!("{}\n\n", "=".repeat(60)));
        out.push_str(&format!(
            "Overall Pass Rate: {} ({}/{})\n",
            pct(self.pass_rate),
            self.passed,
            self.total_tests
        ));
        out.push_str(&format!("Average Response Time: {:.2}ms\n\n", self.average_response_time_ms));

        out.push_str("Category Performance:\n");
        for (category, score) in &self.category_scores {
            out.push_str(&format!("  {}: {}\n", category, pct(*score)));
        }

        let failed: Vec<&KeywordResult> = self.detailed_results.iter().filter(|r| !r.passed).collect();
        if !failed.is_empty() {
            out.push_str(&format!("\nFailed cases ({}):\n", failed.len()));
            for r in failed {
                out.push_str(&format!("  - {}\n", preview(&r.query, 60)));
                match &r.error {
                    Some(err) => out.push_str(&format!("    error: {}\n", err)),
                    None => out.push_str(&format!(
                        "    score: {} (required {}), missing: {}\n",
                        pct(r.score),
                        pct(r.min_score_required),
                        r.missing_keywords.join(", ")
                    )),
                }
            }
        }
        out
    }
}

/// Scores formatted answers, not retrieval ranks.
pub struct KeywordEvaluator<'a> {
    doc: &'a ResumeDocument,
    aggregator: &'a Aggregator,
    formatter: &'a AnswerFormatter,
}

impl<'a> KeywordEvaluator<'a> {
    pub fn new(doc: &'a ResumeDocument, aggregator: &'a Aggregator, formatter: &'a AnswerFormatter) -> Self {
        Self {
            doc,
            aggregator,
            formatter,
        }
    }

    /// Answer one case. A formatter failure is recorded on the result.
    pub fn evaluate_case(&self, case: &KeywordCase) -> KeywordResult {
        let start = Instant::now();
        match answer_question(self.doc, self.aggregator, self.formatter, &case.query) {
            Ok(report) => {
                let elapsed = start.elapsed().as_secs_f64() * 1000.0;
                KeywordResult::scored(case, &report.answer.text, elapsed)
            }
            Err(err) => {
                tracing::debug!(query = %case.query, error = %err, "answer failed during keyword check");
                KeywordResult::failed(case, err.to_string())
            }
        }
    }

    pub fn run(&self, set: &KeywordSet) -> KeywordSummary {
        self.run_with_progress(set, |_, _| {})
    }

    /// Like [`Evaluator::run_with_progress`]: `progress` gets the 1-based
    /// index and result after each case.
    pub fn run_with_progress<F>(&self, set: &KeywordSet, mut progress: F) -> KeywordSummary
    where
        F: FnMut(usize, &KeywordResult),
    {
        let mut results = Vec::with_capacity(set.cases.len());
        for (i, case) in set.cases.iter().enumerate() {
            let result = self.evaluate_case(case);
            progress(i + 1, &result);
            results.push(result);
        }

        let summary = KeywordSummary::from_results(results);
        tracing::info!(
            cases = summary.total_tests,
            passed = summary.passed,
            "answer keyword evaluation finished"
        );
        summary
    }
}

fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatOptions;
    use crate::testing::sample_document;
    use tempfile::TempDir;

    const QUESTIONS: &str = r#"{
      "questions": [
        {"id": "q1", "question": "What AI/ML models have they built?", "category": "ai_ml",
         "expected_sections": ["experience_justworks", "skills_ai_ml"]},
        {"id": "q2", "question": "What revenue impact did they drive?", "category": "impact",
         "expected_sections": ["key_metrics"]},
        {"id": "q3", "question": "Any patents?", "category": "other",
         "expected_sections": ["publications"]}
      ],
      "evaluation_criteria": {"retrieval_at_1": 0.6, "retrieval_at_3": 0.6, "p50_latency_ms": 1000},
      "categories": {"ai_ml": "AI/ML depth", "impact": "Business impact"}
    }"#;

    fn ids(names: &[&str]) -> Vec<SectionId> {
        names
            .iter()
            .map(|n| serde_json::from_value(json!(n)).unwrap())
            .collect()
    }

    fn expected(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rank_of_first_match_is_the_best_rank() {
        let retrieved = ids(&["key_metrics", "experience_stash", "experience_justworks"]);
        let score = score_ranks(&expected(&["experience_justworks", "experience_stash"]), &retrieved);
        assert_eq!(score.all_ranks, vec![3, 2]);
        assert_eq!(score.rank_of_first_match, Some(2));
        assert!(!score.retrieval_at_1);
        assert!(score.retrieval_at_3);
        assert_eq!(score.reciprocal_rank, 0.5);
    }

    #[test]
    fn loose_matching_in_both_directions() {
        let retrieved = ids(&["experience_justworks"]);
        let score = score_ranks(&expected(&["experience"]), &retrieved);
        assert_eq!(score.rank_of_first_match, Some(1));
        let score = score_ranks(&expected(&["experience_justworks_ai"]), &retrieved);
        assert_eq!(score.rank_of_first_match, Some(1));
    }

    #[test]
    fn no_match_scores_zero() {
        let score = score_ranks(&expected(&["education"]), &ids(&["key_metrics"]));
        assert_eq!(score.rank_of_first_match, None);
        assert_eq!(score.reciprocal_rank, 0.0);
        assert!(!score.retrieval_at_5);
    }

    #[test]
    fn nearest_rank_percentiles() {
        let sorted: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.50), 5.0);
        assert_eq!(percentile(&sorted, 0.90), 9.0);
        assert_eq!(percentile(&sorted, 0.99), 10.0);
        assert_eq!(percentile(&[7.0], 0.5), 7.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn run_scores_question_set() {
        let doc = sample_document();
        let aggregator = Aggregator::standard();
        let set = QuestionSet::from_json_str(QUESTIONS).unwrap();
        let mut seen = Vec::new();
        let run = Evaluator::new(&doc, &aggregator).run_with_progress(&set, |i, r| seen.push((i, r.passed)));

        assert_eq!(seen, vec![(1, true), (2, true), (3, false)]);
        let m = &run.metrics;
        assert_eq!(m.total_questions, 3);
        assert_eq!(m.passed_questions, 2);
        assert!((m.pass_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(m.category_scores["other"], 0.0);
        assert_eq!(m.category_scores["impact"], 1.0);
        assert!(!run.results[2].has_citations);
        assert!(run.verdict.retrieval_at_3);
    }

    #[test]
    fn report_and_saved_json() {
        let doc = sample_document();
        let aggregator = Aggregator::standard();
        let set = QuestionSet::from_json_str(QUESTIONS).unwrap();
        let run = Evaluator::new(&doc, &aggregator).run(&set);

        let report = run.render_report(&set);
        assert!(report.contains("Passed: 2/3"));
        assert!(report.contains("Business impact"));
        assert!(report.contains("Failed questions (1)"));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        run.save_results(&path).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["detailed_results"].as_array().unwrap().len(), 3);
        assert_eq!(saved["detailed_results"][1]["rank"], 1);
        assert!(saved["detailed_results"][2]["rank"].is_null());
        assert!(saved["metrics"]["mrr"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn missing_question_file_is_io_error() {
        let err = QuestionSet::load(Path::new("/nonexistent/questions.json")).unwrap_err();
        assert!(matches!(err, EvalError::Io { .. }));
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keyword_score_is_case_insensitive_fraction() {
        let expected = keywords(&["$5M", "Revenue", "patents", "ML-powered"]);
        let (score, found) = keyword_score("• Generated $5m new revenue\n• Built ml-powered model", &expected);
        assert_eq!(score, 0.75);
        assert_eq!(found, keywords(&["$5M", "Revenue", "ML-powered"]));
    }

    #[test]
    fn keyword_score_without_keywords_is_zero() {
        let (score, found) = keyword_score("anything", &[]);
        assert_eq!(score, 0.0);
        assert!(found.is_empty());
    }

    #[test]
    fn keyword_pass_uses_unrounded_score() {
        let case = KeywordCase {
            query: "q".into(),
            expected_keywords: keywords(&["a", "b", "c"]),
            category: "x".into(),
            min_score: 0.67,
        };
        let result = KeywordResult::scored(&case, "a b", 1.0);
        assert_eq!(result.score, 0.67);
        assert!(!result.passed);
        assert_eq!(result.missing_keywords, keywords(&["c"]));
    }

    #[test]
    fn min_score_defaults_when_omitted() {
        let set = KeywordSet::from_json_str(
            r#"{"cases": [{"query": "q", "expected_keywords": ["x"], "category": "c"}]}"#,
        )
        .unwrap();
        assert_eq!(set.cases[0].min_score, 0.7);
    }

    #[test]
    fn keyword_run_scores_formatted_answers() {
        let doc = sample_document();
        let aggregator = Aggregator::standard();
        let formatter = AnswerFormatter::new(&doc, FormatOptions::default());
        let set = KeywordSet::from_json_str(
            r#"{"cases": [
              {"query": "What revenue impact did they drive?", "category": "metrics",
               "expected_keywords": ["$5M", "$4M", "$20M", "85%"], "min_score": 0.7},
              {"query": "What AI/ML models have they built?", "category": "ai_ml",
               "expected_keywords": ["92%", "Claude Code", "AI adoption", "quantum"], "min_score": 0.7},
              {"query": "Does this person hold any patents?", "category": "other",
               "expected_keywords": ["patent"], "min_score": 0.5}
            ]}"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        let summary = KeywordEvaluator::new(&doc, &aggregator, &formatter)
            .run_with_progress(&set, |i, r| seen.push((i, r.passed)));

        assert_eq!(seen, vec![(1, true), (2, true), (3, false)]);
        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pass_rate, 0.67);
        assert_eq!(summary.category_scores["metrics"], 1.0);
        assert_eq!(summary.category_scores["ai_ml"], 0.75);
        assert_eq!(summary.category_scores["other"], 0.0);
        assert_eq!(summary.detailed_results[1].missing_keywords, keywords(&["quantum"]));

        let report = summary.render_report();
        assert!(report.contains("Overall Pass Rate: 67% (2/3)"));
        assert!(report.contains("Failed cases (1)"));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        summary.save_results(&path).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["detailed_results"][2]["found_keywords"], json!([]));
        assert_eq!(saved["passed"], 2);
    }
}
