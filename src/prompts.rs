//! Prompt templates exposed over MCP `prompts/list` / `prompts/get`.
//!
//! Each template is plain text rendered with the résumé owner's name and
//! the caller's arguments. Nothing is retrieved at render time; the client
//! model is expected to call the tools for evidence.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use resume_harness_core::ResumeDocument;

use crate::config::Config;
use crate::store::load_document;

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

type Render = fn(owner: &str, args: &Map<String, Value>) -> String;

pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArgument],
    render: Render,
}

/// A rendered prompt, ready to hand to the client as a single user message.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPrompt {
    pub name: String,
    pub description: String,
    pub text: String,
}

fn arg<'a>(args: &'a Map<String, Value>, name: &str) -> &'a str {
    args.get(name).and_then(Value::as_str).unwrap_or("")
}

const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "why_great_fit_for_ai_pm",
        description: "Make the case for the candidate as an AI Product Manager",
        arguments: &[],
        render: |owner, _| {
            format!(
                "Based on {owner}'s resume, explain why {owner} would be an excellent fit for an \
                 AI Product Manager role.\n\n\
                 Focus on:\n\
                 1. Hands-on AI/ML experience (models built and their measured accuracy)\n\
                 2. Track record in regulated industries\n\
                 3. Experience scaling products from 0 to 1 and optimizing existing platforms\n\
                 4. Leadership in AI adoption and training other PMs\n\
                 5. Quantifiable business impact (revenue and efficiency metrics)\n\
                 6. Technical depth (education, technical PM roles, hands-on building)\n\n\
                 Make the response compelling, specific, and backed by concrete examples from \
                 the resume. Use the search_experience, get_ai_ml_experience and \
                 get_metrics_and_impact tools for evidence."
            )
        },
    },
    PromptTemplate {
        name: "interview_question",
        description: "Draft an interview answer on a topic from the candidate's experience",
        arguments: &[PromptArgument {
            name: "topic",
            description: "Interview topic or question to answer",
            required: true,
        }],
        render: |owner, args| {
            format!(
                "Using {owner}'s resume, craft a strong interview response about: {topic}\n\n\
                 Guidelines:\n\
                 - Use specific examples from the resume\n\
                 - Include quantifiable metrics where relevant\n\
                 - Follow the STAR format (Situation, Task, Action, Result)\n\
                 - Keep it concise but impactful\n\
                 - Highlight relevant skills and achievements",
                topic = arg(args, "topic")
            )
        },
    },
    PromptTemplate {
        name: "compare_to_job_description",
        description: "Compare the candidate's qualifications to a job description",
        arguments: &[PromptArgument {
            name: "job_requirements",
            description: "The job requirements to compare against",
            required: true,
        }],
        render: |owner, args| {
            format!(
                "Compare {owner}'s qualifications to these job requirements:\n\n\
                 {requirements}\n\n\
                 For each requirement:\n\
                 1. Indicate whether {owner} meets it (Yes/Partial/No)\n\
                 2. Provide specific evidence from the resume\n\
                 3. Highlight any qualifications that exceed the requirement",
                requirements = arg(args, "job_requirements")
            )
        },
    },
    PromptTemplate {
        name: "generate_cover_letter_points",
        description: "Generate key cover letter points for a company and role",
        arguments: &[
            PromptArgument {
                name: "company",
                description: "Company being applied to",
                required: true,
            },
            PromptArgument {
                name: "role",
                description: "Role being applied for",
                required: true,
            },
        ],
        render: |owner, args| {
            format!(
                "Generate 3-5 compelling cover letter points for {owner} applying to {role} at \
                 {company}.\n\n\
                 Each point should:\n\
                 - Connect specific experience to the role\n\
                 - Include quantifiable achievements\n\
                 - Demonstrate understanding of the company's needs\n\
                 - Show a unique value proposition",
                role = arg(args, "role"),
                company = arg(args, "company")
            )
        },
    },
];

pub fn prompts() -> &'static [PromptTemplate] {
    PROMPTS
}

pub fn find_prompt(name: &str) -> Option<&'static PromptTemplate> {
    PROMPTS.iter().find(|p| p.name == name)
}

impl PromptTemplate {
    /// Render with the document owner's name. Every required argument must
    /// be present as a non-blank string.
    pub fn render(&self, doc: &ResumeDocument, args: &Map<String, Value>) -> Result<RenderedPrompt> {
        for a in self.arguments.iter().filter(|a| a.required) {
            match args.get(a.name) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(Value::String(_)) | None | Some(Value::Null) => {
                    bail!("prompt '{}': missing required argument: {}", self.name, a.name)
                }
                Some(_) => bail!("prompt '{}': argument '{}' must be a string", self.name, a.name),
            }
        }

        Ok(RenderedPrompt {
            name: self.name.to_string(),
            description: self.description.to_string(),
            text: (self.render)(doc.owner_name(), args),
        })
    }
}

/// `resume prompt <name> [key=value...]`; with no name, lists the prompts.
pub fn run_prompt(config: &Config, name: Option<&str>, args: &[(String, String)]) -> Result<()> {
    let Some(name) = name else {
        for p in prompts() {
            let params: Vec<String> = p
                .arguments
                .iter()
                .map(|a| if a.required { a.name.to_string() } else { format!("[{}]", a.name) })
                .collect();
            println!("{:<30} {:<40} {}", p.name, params.join(" "), p.description);
        }
        return Ok(());
    };

    let template = find_prompt(name).ok_or_else(|| anyhow::anyhow!("prompt not found: {}", name))?;
    let doc = load_document(config)?;
    let args: Map<String, Value> = args
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    println!("{}", template.render(&doc, &args)?.text);
    Ok(())
}
