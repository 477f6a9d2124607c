use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use resume_harness_core::format::FormatOptions;
use resume_harness_core::tenure::default_placeholders;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub resume: ResumeConfig,
    #[serde(default)]
    pub answer: AnswerConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResumeConfig {
    pub path: PathBuf,
    #[serde(default = "default_placeholders")]
    pub placeholder_companies: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnswerConfig {
    #[serde(default = "default_max_bullets")]
    pub max_bullets: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default)]
    pub strict: bool,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            max_bullets: default_max_bullets(),
            max_chars: default_max_chars(),
            strict: false,
        }
    }
}

impl AnswerConfig {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            max_bullets: self.max_bullets,
            max_chars: self.max_chars,
            strict: self.strict,
        }
    }
}

fn default_max_bullets() -> usize {
    6
}
fn default_max_chars() -> usize {
    700
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct EvalConfig {
    #[serde(default = "default_questions")]
    pub questions: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Keyword-labelled cases for `resume eval --answers`.
    #[serde(default = "default_answers")]
    pub answers: PathBuf,
    #[serde(default = "default_answers_output")]
    pub answers_output: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            output: default_output(),
            answers: default_answers(),
            answers_output: default_answers_output(),
        }
    }
}

fn default_questions() -> PathBuf {
    PathBuf::from("./eval/hiring_manager_questions.json")
}
fn default_output() -> PathBuf {
    PathBuf::from("eval_results.json")
}
fn default_answers() -> PathBuf {
    PathBuf::from("./eval/answer_keywords.json")
}
fn default_answers_output() -> PathBuf {
    PathBuf::from("answer_eval_results.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults pointing at the bundled sample files, for running without a
    /// config file.
    pub fn minimal() -> Self {
        Self {
            resume: ResumeConfig {
                path: PathBuf::from("./data/resume_data.json"),
                placeholder_companies: default_placeholders(),
            },
            answer: AnswerConfig::default(),
            server: ServerConfig::default(),
            eval: EvalConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.resume.path.as_os_str().is_empty() {
        anyhow::bail!("resume.path must not be empty");
    }

    if config.answer.max_bullets == 0 {
        anyhow::bail!("answer.max_bullets must be >= 1");
    }

    if config.answer.max_chars == 0 {
        anyhow::bail!("answer.max_chars must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_text: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_text)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let config = parse("[resume]\npath = \"./resume.json\"\n").unwrap();
        assert_eq!(config.resume.placeholder_companies, vec!["Beander"]);
        assert_eq!(config.answer.max_bullets, 6);
        assert_eq!(config.answer.max_chars, 700);
        assert!(!config.answer.strict);
        assert_eq!(config.server.bind, "127.0.0.1:7341");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn full_file_overrides() {
        let config = parse(
            r#"
[resume]
path = "./r.json"
placeholder_companies = []

[answer]
max_bullets = 3
max_chars = 200
strict = true

[server]
bind = "0.0.0.0:9000"

[eval]
questions = "./q.json"
output = "./out.json"

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();
        assert!(config.resume.placeholder_companies.is_empty());
        assert_eq!(config.answer.format_options().max_bullets, 3);
        assert!(config.answer.format_options().strict);
        assert_eq!(config.eval.output, PathBuf::from("./out.json"));
        assert_eq!(config.eval.answers, PathBuf::from("./eval/answer_keywords.json"));
        assert!(config.logging.json);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = parse("[resume]\npath = \"r.json\"\n[answer]\nmax_bullets = 0\n").unwrap_err();
        assert!(err.to_string().contains("answer.max_bullets"));
        let err = parse("[resume]\npath = \"r.json\"\n[answer]\nmax_chars = 0\n").unwrap_err();
        assert!(err.to_string().contains("answer.max_chars"));
    }

    #[test]
    fn resume_section_is_required() {
        assert!(parse("[server]\nbind = \"127.0.0.1:1\"\n").is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/resume.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/resume.toml"));
    }
}
