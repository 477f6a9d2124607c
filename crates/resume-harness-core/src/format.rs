//! Compact answer formatter.
//!
//! Turns a retrieval result into a short bulleted answer in which every
//! bullet ends with a `[section_id]` citation tag and has a matching entry
//! in `citations`. The template is picked from the question's
//! [`QuestionIntent`]; each template reads only the fields it knows about
//! and yields nothing when the data has a different shape.
//!
//! Post-processing keeps at most `max_bullets` bullets, then drops trailing
//! bullets (never splitting one) until the joined text fits `max_chars`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::intent::{QuestionIntent, QuestionSignals};
use crate::models::ResumeDocument;
use crate::retrieval::RetrievalResult;
use crate::section::{section_id_of, SectionId, SectionRef};

/// Fixed answer for absent evidence.
pub const NO_EVIDENCE_TEXT: &str = "• Not evidenced in the resume";

const BULLET: &str = "•";
const ACHIEVEMENT_PREVIEW_CHARS: usize = 80;
const GENERAL_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub max_bullets: usize,
    pub max_chars: usize,
    /// Report a template/shape mismatch as an error instead of returning
    /// an answer with no bullets.
    pub strict: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_bullets: 6,
            max_chars: 700,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub section_id: SectionId,
    /// The underlying source text, not the formatted bullet.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerMetadata {
    pub bullet_count: usize,
    pub char_count: usize,
    pub has_evidence: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
    pub metadata: AnswerMetadata,
}

impl FormattedAnswer {
    pub fn no_evidence() -> Self {
        Self {
            text: NO_EVIDENCE_TEXT.to_string(),
            citations: Vec::new(),
            metadata: AnswerMetadata {
                bullet_count: 1,
                char_count: NO_EVIDENCE_TEXT.chars().count(),
                has_evidence: false,
            },
        }
    }
}

/// A bullet line paired with its citation.
struct Bullet {
    line: String,
    citation: Citation,
}

impl Bullet {
    fn new(text: &str, section_id: SectionId, content: impl Into<String>) -> Self {
        Self {
            line: format!("{} {} [{}]", BULLET, one_line(text), section_id),
            citation: Citation {
                section_id,
                content: content.into(),
            },
        }
    }
}

pub struct AnswerFormatter {
    options: FormatOptions,
    /// Section cited for AI/ML bullets: the current role.
    ai_section: SectionId,
}

impl AnswerFormatter {
    pub fn new(doc: &ResumeDocument, options: FormatOptions) -> Self {
        let ai_section = doc
            .current_role()
            .map(|role| section_id_of(SectionRef::Company(&role.company)))
            .unwrap_or_else(|| section_id_of(SectionRef::Resume));
        Self { options, ai_section }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn format(&self, question: &str, data: Option<&RetrievalResult>) -> Result<FormattedAnswer, FormatError> {
        self.format_as(QuestionSignals::from_question(question).intent(), data)
    }

    /// Format with an already classified intent.
    pub fn format_as(
        &self,
        intent: QuestionIntent,
        data: Option<&RetrievalResult>,
    ) -> Result<FormattedAnswer, FormatError> {
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            return Ok(FormattedAnswer::no_evidence());
        };

        let value = data.to_value();
        let mut bullets = match intent {
            QuestionIntent::AiMl => self.ai_ml_bullets(&value),
            QuestionIntent::Impact => impact_bullets(&value),
            QuestionIntent::Experience => experience_bullets(&value),
            QuestionIntent::Skill => skill_bullets(&value),
            QuestionIntent::General => general_bullets(&value),
        };

        if bullets.is_empty() {
            if self.options.strict {
                return Err(shape_mismatch(intent));
            }
            if intent == QuestionIntent::General {
                bullets.push(Bullet::new(
                    "Information available in resume",
                    section_id_of(SectionRef::Resume),
                    "See full resume for details",
                ));
            }
        }

        Ok(self.finish(bullets))
    }

    fn finish(&self, mut bullets: Vec<Bullet>) -> FormattedAnswer {
        bullets.truncate(self.options.max_bullets);

        let mut text = join_lines(&bullets);
        while text.chars().count() > self.options.max_chars && !bullets.is_empty() {
            bullets.pop();
            text = join_lines(&bullets);
        }

        let metadata = AnswerMetadata {
            bullet_count: bullets.len(),
            char_count: text.chars().count(),
            has_evidence: true,
        };
        FormattedAnswer {
            text,
            citations: bullets.into_iter().map(|b| b.citation).collect(),
            metadata,
        }
    }

    fn ai_ml_bullets(&self, data: &Value) -> Vec<Bullet> {
        let mut bullets = Vec::new();
        let Some(obj) = data.as_object() else {
            return bullets;
        };

        for model in strings(obj, "models_built") {
            bullets.push(Bullet::new(&format!("Built {}", model), self.ai_section.clone(), model));
        }

        let tools = strings(obj, "tools_used");
        if !tools.is_empty() {
            let joined = tools.join(", ");
            bullets.push(Bullet::new(
                &format!("Uses {} for AI development", joined),
                section_id_of(SectionRef::SkillCategory("ai_ml")),
                joined,
            ));
        }

        for initiative in strings(obj, "initiatives_led").into_iter().take(2) {
            bullets.push(Bullet::new(initiative, self.ai_section.clone(), initiative));
        }

        bullets
    }
}

fn impact_bullets(data: &Value) -> Vec<Bullet> {
    let mut bullets = Vec::new();
    let Some(obj) = data.as_object() else {
        return bullets;
    };
    let metrics = section_id_of(SectionRef::KeyMetrics);

    for impact in strings(obj, "revenue_impact").into_iter().take(3) {
        bullets.push(Bullet::new(&format!("Generated {}", impact), metrics.clone(), impact));
    }
    for gain in strings(obj, "efficiency_gains").into_iter().take(2) {
        bullets.push(Bullet::new(&format!("Achieved {}", gain), metrics.clone(), gain));
    }

    bullets
}

fn experience_bullets(data: &Value) -> Vec<Bullet> {
    let mut bullets = Vec::new();

    for m in matches(data).iter().take(4) {
        let Some(company) = m.get("company").and_then(Value::as_str) else {
            continue;
        };
        let section = section_id_of(SectionRef::Company(company));
        let title = m.get("title").and_then(Value::as_str).unwrap_or("Role");
        let role = format!("{} at {}", title, company);
        bullets.push(Bullet::new(&role, section.clone(), role.clone()));

        if let Some(achievement) = m.get("achievement").and_then(Value::as_str) {
            let preview = preview(achievement, ACHIEVEMENT_PREVIEW_CHARS, "...");
            bullets.push(Bullet::new(&preview, section, preview.clone()));
        }
    }

    bullets
}

fn skill_bullets(data: &Value) -> Vec<Bullet> {
    matches(data)
        .iter()
        .take(4)
        .filter(|m| m.get("type").and_then(Value::as_str) == Some("skill"))
        .filter_map(|m| {
            let category = m.get("category").and_then(Value::as_str)?;
            let skill = m.get("skill").and_then(Value::as_str)?;
            Some(Bullet::new(skill, section_id_of(SectionRef::SkillCategory(category)), skill))
        })
        .collect()
}

/// First four entries of any mapping: the first element of a list, or a
/// string itself, each cut to 100 characters.
fn general_bullets(data: &Value) -> Vec<Bullet> {
    let Some(obj) = data.as_object() else {
        return Vec::new();
    };
    let resume = section_id_of(SectionRef::Resume);

    obj.values()
        .take(4)
        .filter_map(|value| match value {
            Value::Array(items) => items.first().map(|first| match first {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .map(|item| {
            let item = preview(&item, GENERAL_PREVIEW_CHARS, "");
            Bullet::new(&item, resume.clone(), item.clone())
        })
        .collect()
}

fn shape_mismatch(intent: QuestionIntent) -> FormatError {
    let expected = match intent {
        QuestionIntent::AiMl => "models_built, tools_used, initiatives_led",
        QuestionIntent::Impact => "revenue_impact, efficiency_gains",
        QuestionIntent::Experience => "matches[].company",
        QuestionIntent::Skill => "matches[] of type skill",
        QuestionIntent::General => "a mapping with list or string values",
    };
    FormatError::ShapeMismatch {
        template: intent.as_str(),
        expected,
    }
}

fn strings<'a>(obj: &'a Map<String, Value>, key: &str) -> Vec<&'a str> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn matches(data: &Value) -> &[Value] {
    data.get("matches")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// First `max` characters, with `ellipsis` appended when cut.
fn preview(text: &str, max: usize, ellipsis: &str) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max).collect();
        cut.push_str(ellipsis);
        cut
    } else {
        text.to_string()
    }
}

/// Bullets are single lines.
fn one_line(text: &str) -> String {
    text.split(['\n', '\r']).collect::<Vec<_>>().join(" ")
}

fn join_lines(bullets: &[Bullet]) -> String {
    bullets
        .iter()
        .map(|b| b.line.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval;
    use crate::testing::sample_document;
    use proptest::prelude::*;
    use serde_json::json;

    fn formatter(options: FormatOptions) -> AnswerFormatter {
        AnswerFormatter::new(&sample_document(), options)
    }

    fn raw(value: Value) -> RetrievalResult {
        RetrievalResult::Raw(value)
    }

    fn bullet_lines(text: &str) -> usize {
        text.lines().filter(|l| l.starts_with(BULLET)).count()
    }

    #[test]
    fn empty_input_gives_fixed_answer() {
        let f = formatter(FormatOptions::default());
        for data in [None, Some(raw(json!({}))), Some(raw(Value::Null)), Some(raw(json!([])))] {
            let answer = f.format("Does this person hold patents?", data.as_ref()).unwrap();
            assert_eq!(answer.text, "• Not evidenced in the resume");
            assert!(answer.citations.is_empty());
            assert_eq!(answer.metadata.bullet_count, 1);
            assert_eq!(answer.metadata.char_count, answer.text.chars().count());
            assert!(!answer.metadata.has_evidence);
        }
    }

    #[test]
    fn ai_template_cites_current_role() {
        let doc = sample_document();
        let f = AnswerFormatter::new(&doc, FormatOptions::default());
        let bundle = RetrievalResult::AiMl(retrieval::get_ai_ml_experience(&doc));
        let answer = f.format("What AI work have they shipped?", Some(&bundle)).unwrap();

        let lines: Vec<&str> = answer.text.lines().collect();
        assert_eq!(
            lines[0],
            "• Built ML-powered underwriting model with 92% accuracy [experience_justworks]"
        );
        assert_eq!(lines[1], "• Uses Claude Code, Cursor for AI development [skills_ai_ml]");
        // only the first two initiatives
        assert_eq!(answer.metadata.bullet_count, 4);
        assert_eq!(answer.citations[1].content, "Claude Code, Cursor");
        assert_eq!(answer.citations[0].content, "ML-powered underwriting model with 92% accuracy");
    }

    #[test]
    fn impact_template_caps_each_group() {
        let doc = sample_document();
        let f = AnswerFormatter::new(&doc, FormatOptions::default());
        let metrics = RetrievalResult::Metrics(retrieval::get_metrics_and_impact(&doc));
        let answer = f.format("What was the revenue impact?", Some(&metrics)).unwrap();

        assert_eq!(answer.metadata.bullet_count, 5);
        assert!(answer.text.starts_with("• Generated $5M new revenue [key_metrics]"));
        assert!(answer.text.ends_with("• Achieved 90% overhead reduction [key_metrics]"));
        assert!(answer.citations.iter().all(|c| c.section_id.as_str() == "key_metrics"));
        assert_eq!(answer.citations[3].content, "85% workload reduction");
    }

    #[test]
    fn metric_keyword_selects_impact_template() {
        let f = formatter(FormatOptions::default());
        let data = raw(json!({"revenue_impact": ["$1M ARR"]}));
        let answer = f.format("Which metrics moved?", Some(&data)).unwrap();
        assert_eq!(answer.text, "• Generated $1M ARR [key_metrics]");
    }

    #[test]
    fn experience_template_emits_role_and_achievement() {
        let doc = sample_document();
        let f = AnswerFormatter::new(&doc, FormatOptions::default());
        let search = RetrievalResult::Experience(retrieval::search_experience(&doc, "launched"));
        let answer = f.format("Which companies did they launch products at?", Some(&search)).unwrap();

        let lines: Vec<&str> = answer.text.lines().collect();
        assert_eq!(lines[0], "• Product Manager at Stash [experience_stash]");
        assert_eq!(
            lines[1],
            "• Launched retirement accounts generating $5M new revenue [experience_stash]"
        );
        assert_eq!(lines[2], "• Technical Product Manager at Casper [experience_casper]");
        assert_eq!(answer.citations[0].content, "Product Manager at Stash");
    }

    #[test]
    fn long_achievements_are_previewed() {
        let f = formatter(FormatOptions::default());
        let long = "x".repeat(120);
        let data = raw(json!({"matches": [{"company": "Big Co", "title": "PM", "achievement": long}]}));
        let answer = f.format("What experience?", Some(&data)).unwrap();
        let expected = format!("{}...", "x".repeat(80));
        assert_eq!(answer.citations[1].content, expected);
        assert_eq!(answer.citations[1].section_id.as_str(), "experience_big_co");
    }

    #[test]
    fn skill_template_uses_skill_matches_only() {
        let doc = sample_document();
        let f = AnswerFormatter::new(&doc, FormatOptions::default());
        let search = RetrievalResult::Skills(retrieval::search_by_skill(&doc, "compliance"));
        let answer = f.format("Compliance skills?", Some(&search)).unwrap();
        assert_eq!(answer.text, "• Compliance [skills_domain]");
        assert_eq!(answer.citations.len(), 1);
    }

    #[test]
    fn shape_mismatch_is_silent_by_default() {
        let f = formatter(FormatOptions::default());
        let data = raw(json!({"unrelated": true}));
        let answer = f.format("What skills?", Some(&data)).unwrap();
        assert_eq!(answer.text, "");
        assert_eq!(answer.metadata.bullet_count, 0);
        assert!(answer.metadata.has_evidence);
    }

    #[test]
    fn shape_mismatch_errors_in_strict_mode() {
        let f = formatter(FormatOptions {
            strict: true,
            ..FormatOptions::default()
        });
        let data = raw(json!({"unrelated": true}));
        let err = f.format("What skills?", Some(&data)).unwrap_err();
        assert!(matches!(err, FormatError::ShapeMismatch { template: "skill", .. }));
    }

    #[test]
    fn general_template_reads_first_four_entries() {
        let f = formatter(FormatOptions::default());
        let data = raw(json!({
            "a": ["first", "second"],
            "b": "plain",
            "c": 3,
            "d": [{"nested": 1}],
            "e": "ignored"
        }));
        let answer = f.format("Where did they study?", Some(&data)).unwrap();
        let lines: Vec<&str> = answer.text.lines().collect();
        assert_eq!(
            lines,
            vec!["• first [resume]", "• plain [resume]", "• {\"nested\":1} [resume]"]
        );
    }

    #[test]
    fn general_template_placeholder() {
        let f = formatter(FormatOptions::default());
        let answer = f.format("Hobbies?", Some(&raw(json!({"n": 1})))).unwrap();
        assert_eq!(answer.text, "• Information available in resume [resume]");
        assert_eq!(answer.citations[0].content, "See full resume for details");
    }

    #[test]
    fn general_strings_are_cut_to_100_chars() {
        let f = formatter(FormatOptions::default());
        let answer = f.format("Hobbies?", Some(&raw(json!({"bio": "y".repeat(150)})))).unwrap();
        assert_eq!(answer.citations[0].content.chars().count(), 100);
    }

    #[test]
    fn trailing_bullets_are_dropped_to_fit() {
        let f = formatter(FormatOptions {
            max_bullets: 6,
            max_chars: 100,
            strict: false,
        });
        let data = raw(json!({"revenue_impact": ["$1M from a long-running enterprise deal", "$2M", "$3M"]}));
        let answer = f.format("impact?", Some(&data)).unwrap();
        // 65 + 1 + 29 fits, a third bullet would not
        assert_eq!(
            answer.text,
            "• Generated $1M from a long-running enterprise deal [key_metrics]\n• Generated $2M [key_metrics]"
        );
        assert_eq!(answer.metadata.bullet_count, 2);
        assert_eq!(answer.metadata.char_count, 95);
        assert_eq!(answer.citations.len(), 2);
    }

    #[test]
    fn bullet_cap_applies_before_char_budget() {
        let f = formatter(FormatOptions {
            max_bullets: 2,
            ..FormatOptions::default()
        });
        let metrics = RetrievalResult::Metrics(retrieval::get_metrics_and_impact(&sample_document()));
        let answer = f.format("impact", Some(&metrics)).unwrap();
        assert_eq!(answer.metadata.bullet_count, 2);
        assert_eq!(answer.citations.len(), 2);
    }

    proptest! {
        #[test]
        fn metadata_matches_text(
            revenue in prop::collection::vec("[ -~]{0,60}", 0..8),
            gains in prop::collection::vec("[a-z\n ]{0,40}", 0..5),
            max_bullets in 1usize..10,
            max_chars in 1usize..800,
        ) {
            let f = formatter(FormatOptions { max_bullets, max_chars, strict: false });
            let data = raw(json!({"revenue_impact": revenue, "efficiency_gains": gains}));
            let answer = f.format("revenue impact", Some(&data)).unwrap();

            prop_assert_eq!(bullet_lines(&answer.text), answer.metadata.bullet_count);
            prop_assert_eq!(answer.text.chars().count(), answer.metadata.char_count);
            prop_assert_eq!(answer.citations.len(), answer.metadata.bullet_count);
            prop_assert!(answer.metadata.bullet_count <= max_bullets);
            prop_assert!(answer.metadata.char_count <= max_chars);
        }

        #[test]
        fn every_bullet_is_cited(question in "[a-z ]{0,30}", items in prop::collection::vec("[A-Za-z ]{1,30}", 1..6)) {
            let f = formatter(FormatOptions::default());
            let data = raw(json!({
                "models_built": items.clone(),
                "revenue_impact": items.clone(),
                "matches": items.iter().map(|i| json!({"company": i, "type": "skill", "category": "technical", "skill": i})).collect::<Vec<_>>(),
            }));
            let answer = f.format(&question, Some(&data)).unwrap();
            for (line, citation) in answer.text.lines().zip(&answer.citations) {
                let tag = format!("[{}]", citation.section_id);
                prop_assert!(line.ends_with(&tag));
            }
        }
    }
}
