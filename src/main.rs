//! # Resume Harness CLI (`resume`)
//!
//! ## Usage
//!
//! ```bash
//! resume --config ./config/resume.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resume serve` | Start the HTTP + MCP server |
//! | `resume ask "<question>"` | Cited compact answer |
//! | `resume search <query>` | Free-text experience search |
//! | `resume skill <skill>` | Skill search |
//! | `resume company <name>` | Company details |
//! | `resume tenure` | Total experience and progression |
//! | `resume ai` | AI/ML experience bundle |
//! | `resume metrics` | Metrics and impact |
//! | `resume show <section>` | Print a `resume://` resource |
//! | `resume tools` | List tools |
//! | `resume prompt <name> k=v` | Render a prompt template |
//! | `resume eval` | Run the retrieval evaluation |
//! | `resume eval --answers` | Check answers for expected keywords |
//! | `resume completions <shell>` | Shell completion script |
//!
//! Without `--config`, `./config/resume.toml` is used when present and
//! the bundled sample files otherwise.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

use resume_harness::config::{self, Config};
use resume_harness::{evaluate, logging, prompts, query, resources, server};

const DEFAULT_CONFIG: &str = "./config/resume.toml";

/// Résumé question answering for AI tools.
#[derive(Parser)]
#[command(
    name = "resume",
    about = "Résumé question answering: cited compact answers over MCP, HTTP and the CLI",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Defaults to `./config/resume.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server with the MCP endpoint at `/mcp`.
    Serve {
        /// Override `[server].bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Answer a question with cited bullets.
    Ask {
        question: String,
        /// Print the full answer report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search experience by keyword, company or title.
    Search { query: String },

    /// Search skills and achievement tags.
    Skill { skill: String },

    /// Show the role and achievements at a company.
    Company { name: String },

    /// Total years of experience and career progression.
    Tenure,

    /// AI/ML experience: models, tools, initiatives, tagged achievements.
    Ai,

    /// Quantified metrics and business impact.
    Metrics,

    /// Print a résumé section as text.
    Show {
        #[arg(value_parser = ["summary", "experience", "skills", "education", "contact"])]
        section: String,
        /// Skill category (only for `skills`).
        category: Option<String>,
    },

    /// List the available tools.
    Tools,

    /// Render a prompt template. Lists templates when no name is given.
    Prompt {
        name: Option<String>,
        /// Template arguments as KEY=VALUE.
        #[arg(value_parser = parse_key_val)]
        args: Vec<(String, String)>,
    },

    /// Replay the labelled question set and report retrieval quality.
    ///
    /// Exits non-zero when any evaluation criterion is not met. With
    /// `--answers`, scores formatted answers for expected keywords instead.
    Eval {
        /// Check answer text for expected keywords.
        #[arg(long)]
        answers: bool,
        /// Question set or keyword cases JSON (defaults to `[eval].questions`
        /// or `[eval].answers`).
        #[arg(long)]
        questions: Option<PathBuf>,
        /// Where to write detailed results (defaults to `[eval].output` or
        /// `[eval].answers_output`).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Suppress per-question progress lines.
        #[arg(long)]
        quiet: bool,
    },

    /// Print a shell completion script.
    Completions { shell: clap_complete::Shell },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => config::load_config(p),
        None if Path::new(DEFAULT_CONFIG).exists() => config::load_config(Path::new(DEFAULT_CONFIG)),
        None => Ok(Config::minimal()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "resume", &mut std::io::stdout());
        return Ok(());
    }

    let mut cfg = resolve_config(cli.config.as_deref())?;
    logging::init_logging(&cfg.logging)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            server::run_server(&cfg).await?;
        }
        Commands::Ask { question, json } => {
            query::run_ask(&cfg, &question, json).await?;
        }
        Commands::Search { query: q } => {
            query::run_search(&cfg, &q).await?;
        }
        Commands::Skill { skill } => {
            query::run_skill(&cfg, &skill).await?;
        }
        Commands::Company { name } => {
            query::run_company(&cfg, &name).await?;
        }
        Commands::Tenure => {
            query::run_tenure(&cfg).await?;
        }
        Commands::Ai => {
            query::run_ai(&cfg).await?;
        }
        Commands::Metrics => {
            query::run_metrics(&cfg).await?;
        }
        Commands::Show { section, category } => {
            resources::run_show(&cfg, &section, category.as_deref())?;
        }
        Commands::Tools => {
            query::run_list_tools()?;
        }
        Commands::Prompt { name, args } => {
            prompts::run_prompt(&cfg, name.as_deref(), &args)?;
        }
        Commands::Eval {
            answers: true,
            questions,
            output,
            quiet,
        } => {
            evaluate::run_answer_eval(&cfg, questions.as_deref(), output.as_deref(), quiet)?;
        }
        Commands::Eval {
            answers: false,
            questions,
            output,
            quiet,
        } => {
            let run = evaluate::run_eval(&cfg, questions.as_deref(), output.as_deref(), quiet)?;
            if !run.verdict.all_met() {
                std::process::exit(1);
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
