//! Tool trait, tool context and the built-in résumé tools.
//!
//! Every operation callers can invoke is a [`Tool`] in a [`ToolRegistry`].
//! The same registry backs `POST /tools/{name}`, the MCP `tools/call`
//! method and the `resume tools` CLI listing, so all three surfaces expose
//! identical names, schemas and results.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ToolRegistry                │
//! │  retrieval · tenure · analytics · answer │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!     ToolContext (document, query log, aggregator, formatter)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use resume_harness::traits::ToolRegistry;
//!
//! let mut tools = ToolRegistry::with_builtins();
//! // tools.register(Box::new(MyTool::new()));
//! ```

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use resume_harness_core::retrieval;
use resume_harness_core::{
    answer_question, calculate_total_experience, AnswerFormatter, AnswerReport, Aggregator,
    ResumeDocument, TenureError, TenureSummary,
};

use crate::analytics::QueryLog;
use crate::config::Config;
use crate::store::current_year;

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// An operation agents can discover and call.
///
/// Registered tools are listed by `GET /tools/list` and MCP `tools/list`
/// and invoked through `POST /tools/{name}` or MCP `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Lowercase identifier with underscores, used as the route path.
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// Whether this tool ships with the server. Defaults to `false`.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema for the parameters object. Callers validate against it
    /// with [`crate::params::validate_params`] before calling
    /// [`execute`](Tool::execute).
    fn parameters_schema(&self) -> Value;

    /// Execute with validated parameters. The returned value is wrapped in
    /// `{ "result": ... }` by the HTTP server.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Serializable tool info for `GET /tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub builtin: bool,
    pub parameters: Value,
}

impl ToolInfo {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            builtin: tool.is_builtin(),
            parameters: tool.parameters_schema(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Everything a tool may read or append to during execution.
///
/// Built once at startup and shared by every request; cloning is cheap.
/// The document is read-only. The query log is the only mutable state.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    doc: Arc<ResumeDocument>,
    query_log: Arc<QueryLog>,
    aggregator: Arc<Aggregator>,
    formatter: Arc<AnswerFormatter>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, doc: Arc<ResumeDocument>, query_log: Arc<QueryLog>) -> Self {
        let formatter = AnswerFormatter::new(&doc, config.answer.format_options());
        Self {
            config,
            doc,
            query_log,
            aggregator: Arc::new(Aggregator::standard()),
            formatter: Arc::new(formatter),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn doc(&self) -> &ResumeDocument {
        &self.doc
    }

    pub fn query_log(&self) -> &QueryLog {
        &self.query_log
    }

    /// Aggregate, select and format. Only a strict-mode shape mismatch fails.
    pub fn answer(&self, question: &str) -> Result<AnswerReport> {
        Ok(answer_question(&self.doc, &self.aggregator, &self.formatter, question)?)
    }

    pub fn tenure(&self) -> Result<TenureSummary, TenureError> {
        calculate_total_experience(&self.doc, current_year(), &self.config.resume.placeholder_companies)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

/// Schema validation has already checked presence and type; blank strings
/// are still rejected here for inputs that are meaningless when empty.
fn required_str<'a>(params: &'a Value, name: &str) -> Result<&'a str> {
    let value = str_param(params, name);
    if value.trim().is_empty() {
        bail!("{} must not be empty", name);
    }
    Ok(value)
}

/// Retrieval inputs accept any string; `""` matches every entry.
fn str_param<'a>(params: &'a Value, name: &str) -> &'a str {
    params[name].as_str().unwrap_or("")
}

fn no_params() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Free-text search over companies, titles and achievements.
pub struct SearchExperienceTool;

#[async_trait]
impl Tool for SearchExperienceTool {
    fn name(&self) -> &str {
        "search_experience"
    }

    fn description(&self) -> &str {
        "Search work experience for a keyword, company or title"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Keyword, company or title to search for" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = str_param(&params, "query");
        Ok(serde_json::to_value(retrieval::search_experience(ctx.doc(), query))?)
    }
}

pub struct AiMlExperienceTool;

#[async_trait]
impl Tool for AiMlExperienceTool {
    fn name(&self) -> &str {
        "get_ai_ml_experience"
    }

    fn description(&self) -> &str {
        "Get all AI/ML experience: models, tools, initiatives and tagged achievements"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(retrieval::get_ai_ml_experience(ctx.doc()))?)
    }
}

pub struct MetricsTool;

#[async_trait]
impl Tool for MetricsTool {
    fn name(&self) -> &str {
        "get_metrics_and_impact"
    }

    fn description(&self) -> &str {
        "Get quantified metrics and business impact"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(retrieval::get_metrics_and_impact(ctx.doc()))?)
    }
}

pub struct SkillSearchTool;

#[async_trait]
impl Tool for SkillSearchTool {
    fn name(&self) -> &str {
        "search_by_skill"
    }

    fn description(&self) -> &str {
        "Find skills and tagged achievements matching a skill"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "skill": { "type": "string", "description": "Skill to search for, e.g. \"SQL\"" }
            },
            "required": ["skill"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let skill = str_param(&params, "skill");
        Ok(serde_json::to_value(retrieval::search_by_skill(ctx.doc(), skill))?)
    }
}

/// Company lookup. A miss is a normal `{ "error": ... }` result, not a
/// tool failure.
pub struct CompanyDetailsTool;

#[async_trait]
impl Tool for CompanyDetailsTool {
    fn name(&self) -> &str {
        "get_company_details"
    }

    fn description(&self) -> &str {
        "Get the role, dates and achievements at a company"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company": { "type": "string", "description": "Company name or part of it" }
            },
            "required": ["company"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let company = str_param(&params, "company");
        Ok(serde_json::to_value(retrieval::get_company_details(ctx.doc(), company))?)
    }
}

/// Tenure summary. A malformed duration fails the call; an empty
/// experience list is reported as `{ "error": ... }`.
pub struct TenureTool;

#[async_trait]
impl Tool for TenureTool {
    fn name(&self) -> &str {
        "calculate_total_experience"
    }

    fn description(&self) -> &str {
        "Calculate total years of experience and career progression"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        match ctx.tenure() {
            Ok(summary) => Ok(serde_json::to_value(summary)?),
            Err(e @ TenureError::NoExperience) => Ok(json!({ "error": e.to_string() })),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct LogQueryTool;

#[async_trait]
impl Tool for LogQueryTool {
    fn name(&self) -> &str {
        "log_query"
    }

    fn description(&self) -> &str {
        "Record a query for usage analytics"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The query that was asked" },
                "response_time_ms": { "type": "number", "description": "How long answering took" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = required_str(&params, "query")?;
        let response_time_ms = params["response_time_ms"].as_f64();
        Ok(serde_json::to_value(ctx.query_log().log(query, response_time_ms))?)
    }
}

pub struct AnalyticsSummaryTool;

#[async_trait]
impl Tool for AnalyticsSummaryTool {
    fn name(&self) -> &str {
        "get_analytics_summary"
    }

    fn description(&self) -> &str {
        "Summarize logged queries by topic with average response time"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(ctx.query_log().summary())?)
    }
}

/// End-to-end answer: every applicable strategy, ranked sections, and a
/// cited compact answer.
pub struct AnswerQuestionTool;

#[async_trait]
impl Tool for AnswerQuestionTool {
    fn name(&self) -> &str {
        "answer_question"
    }

    fn description(&self) -> &str {
        "Answer a question about the candidate with cited bullets"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": { "type": "string", "description": "A hiring-manager style question" }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let question = required_str(&params, "question")?;
        Ok(serde_json::to_value(ctx.answer(question)?)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Registry for tools. Names are unique; the first registration wins on
/// lookup.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding the nine built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchExperienceTool));
        registry.register(Box::new(AiMlExperienceTool));
        registry.register(Box::new(MetricsTool));
        registry.register(Box::new(SkillSearchTool));
        registry.register(Box::new(CompanyDetailsTool));
        registry.register(Box::new(TenureTool));
        registry.register(Box::new(LogQueryTool));
        registry.register(Box::new(AnalyticsSummaryTool));
        registry.register(Box::new(AnswerQuestionTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn infos(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(|t| ToolInfo::of(t.as_ref())).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
