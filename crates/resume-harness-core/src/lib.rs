//! # Resume Harness Core
//!
//! Pure retrieval-and-formatting pipeline for a single résumé document:
//! data model, section identifiers, question classification, retrieval
//! strategies, the multi-strategy aggregator, the compact answer formatter,
//! and the offline evaluation harness.
//!
//! This crate contains no tokio, HTTP, or protocol dependencies. The only
//! I/O is the explicit `load` helpers for the résumé and question-set files.
//!
//! ```text
//! ResumeDocument ─▶ retrieval ─▶ aggregate ─▶ format ─▶ caller
//!                        │            │
//!                        └────────────┴──▶ eval (scores against ground truth)
//! ```

pub mod aggregate;
pub mod answer;
pub mod document;
pub mod error;
pub mod eval;
pub mod format;
pub mod intent;
pub mod models;
pub mod retrieval;
pub mod section;
pub mod tenure;

#[cfg(test)]
mod testing;

pub use aggregate::{rank_sections, AggregateResult, Aggregator, RetrievalStrategy};
pub use answer::{answer_question, AnswerReport};
pub use error::{DocumentError, EvalError, FormatError, StrategyError, TenureError};
pub use eval::{EvalRun, Evaluator, KeywordEvaluator, KeywordSet, KeywordSummary, QuestionSet};
pub use format::{AnswerFormatter, FormatOptions, FormattedAnswer};
pub use intent::{QuestionIntent, QuestionSignals};
pub use models::ResumeDocument;
pub use retrieval::RetrievalResult;
pub use section::{section_id_of, SectionId, SectionRef};
pub use tenure::{calculate_total_experience, TenureSummary};
