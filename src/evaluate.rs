//! `resume eval`: replay the labelled question set and report. With
//! `--answers`, score formatted answers for expected keywords instead.

use anyhow::{Context, Result};
use std::path::Path;

use resume_harness_core::{
    Aggregator, AnswerFormatter, EvalRun, Evaluator, KeywordEvaluator, KeywordSet, KeywordSummary, QuestionSet,
};

use crate::config::Config;
use crate::store::load_document;

/// Run the evaluation, print the report, write detailed results.
///
/// Returns the run so the caller can decide the exit status from
/// `verdict.all_met()`.
pub fn run_eval(
    config: &Config,
    questions: Option<&Path>,
    output: Option<&Path>,
    quiet: bool,
) -> Result<EvalRun> {
    let questions = questions.unwrap_or(config.eval.questions.as_path());
    let output = output.unwrap_or(config.eval.output.as_path());

    let doc = load_document(config)?;
    let set = QuestionSet::load(questions)
        .with_context(|| format!("Failed to load question set: {}", questions.display()))?;

    let aggregator = Aggregator::standard();
    let evaluator = Evaluator::new(&doc, &aggregator);
    let total = set.questions.len();

    let run = evaluator.run_with_progress(&set, |i, result| {
        if !quiet {
            eprintln!(
                "[{}/{}] {} {} (rank: {})",
                i,
                total,
                if result.passed { "PASS" } else { "FAIL" },
                result.question_id,
                result
                    .rank_of_first_match
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    });

    println!("{}", run.render_report(&set));

    run.save_results(output)
        .with_context(|| format!("Failed to write results: {}", output.display()))?;
    println!("Detailed results saved to: {}", output.display());

    Ok(run)
}

/// Answer every keyword case, print the summary, write detailed results.
pub fn run_answer_eval(
    config: &Config,
    cases: Option<&Path>,
    output: Option<&Path>,
    quiet: bool,
) -> Result<KeywordSummary> {
    let cases = cases.unwrap_or(config.eval.answers.as_path());
    let output = output.unwrap_or(config.eval.answers_output.as_path());

    let doc = load_document(config)?;
    let set = KeywordSet::load(cases).with_context(|| format!("Failed to load keyword cases: {}", cases.display()))?;

    let aggregator = Aggregator::standard();
    let formatter = AnswerFormatter::new(&doc, config.answer.format_options());
    let evaluator = KeywordEvaluator::new(&doc, &aggregator, &formatter);
    let total = set.cases.len();

    let summary = evaluator.run_with_progress(&set, |i, result| {
        if !quiet {
            eprintln!(
                "[{}/{}] {} {:.0}% (required {:.0}%) {}",
                i,
                total,
                if result.passed { "PASS" } else { "FAIL" },
                result.score * 100.0,
                result.min_score_required * 100.0,
                result.query
            );
        }
    });

    println!("{}", summary.render_report());

    summary
        .save_results(output)
        .with_context(|| format!("Failed to write results: {}", output.display()))?;
    println!("Detailed results saved to: {}", output.display());

    Ok(summary)
}
