//! CLI front-ends for the tools: `ask`, `search`, `skill`, `company`,
//! `tenure`, `ai`, `metrics` and `tools`.
//!
//! Raw retrieval commands print the tool's JSON result to stdout, exactly
//! what `POST /tools/{name}` would return inside `result`. `ask` prints the
//! formatted answer unless `--json` is given.

use anyhow::{bail, Result};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::analytics::QueryLog;
use crate::config::Config;
use crate::params::validate_params;
use crate::store::load_document;
use crate::traits::{ToolContext, ToolRegistry};

fn context(config: &Config) -> Result<ToolContext> {
    let doc = load_document(config)?;
    Ok(ToolContext::new(
        Arc::new(config.clone()),
        Arc::new(doc),
        Arc::new(QueryLog::new()),
    ))
}

/// Run one built-in tool and return its result.
pub async fn call_tool(ctx: &ToolContext, name: &str, params: Value) -> Result<Value> {
    let registry = ToolRegistry::with_builtins();
    let Some(tool) = registry.find(name) else {
        bail!("no tool registered with name: {}", name);
    };
    let params = validate_params(&tool.parameters_schema(), &params)?;
    tool.execute(params, ctx).await
}

async fn print_tool(config: &Config, name: &str, params: Value) -> Result<()> {
    let ctx = context(config)?;
    let result = call_tool(&ctx, name, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    print_tool(config, "search_experience", json!({ "query": query })).await
}

pub async fn run_skill(config: &Config, skill: &str) -> Result<()> {
    print_tool(config, "search_by_skill", json!({ "skill": skill })).await
}

pub async fn run_company(config: &Config, company: &str) -> Result<()> {
    print_tool(config, "get_company_details", json!({ "company": company })).await
}

pub async fn run_tenure(config: &Config) -> Result<()> {
    print_tool(config, "calculate_total_experience", json!({})).await
}

pub async fn run_ai(config: &Config) -> Result<()> {
    print_tool(config, "get_ai_ml_experience", json!({})).await
}

pub async fn run_metrics(config: &Config) -> Result<()> {
    print_tool(config, "get_metrics_and_impact", json!({})).await
}

/// `resume ask "<question>"`: the cited answer, then ranked sections.
pub async fn run_ask(config: &Config, question: &str, as_json: bool) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }
    let ctx = context(config)?;
    let report = ctx.answer(question)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.answer.text);
    println!();
    let sections: Vec<&str> = report.sections.iter().map(|s| s.as_str()).collect();
    if sections.is_empty() {
        println!("Sections: (none)");
    } else {
        println!("Sections: {}", sections.join(", "));
    }
    println!(
        "Intent: {}  Source: {}  Latency: {:.2}ms",
        report.intent.as_str(),
        report.source.as_deref().unwrap_or("-"),
        report.latency_ms
    );
    Ok(())
}

/// `resume tools`: name, parameters and description of every tool.
pub fn run_list_tools() -> Result<()> {
    let registry = ToolRegistry::with_builtins();
    for info in registry.infos() {
        let required: Vec<&str> = info.parameters["required"]
            .as_array()
            .map(|a| a.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        println!("{:<28} {:<12} {}", info.name, required.join(","), info.description);
    }
    Ok(())
}
