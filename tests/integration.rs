use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn resume_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_resume"))
}

fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}

fn setup_test_env() -> (TempDir, PathBuf) {
    setup_with_resume(&fs::read_to_string(fixture("data/resume_data.json")).unwrap())
}

fn setup_with_resume(resume_json: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    fs::write(root.join("resume.json"), resume_json).unwrap();
    fs::copy(
        fixture("eval/hiring_manager_questions.json"),
        root.join("questions.json"),
    )
    .unwrap();

    let config_content = format!(
        r#"[resume]
path = "{root}/resume.json"

[answer]
max_bullets = 6
max_chars = 700

[eval]
questions = "{root}/questions.json"
output = "{root}/eval_results.json"

[logging]
level = "warn"
"#,
        root = root.display()
    );

    let config_path = root.join("resume.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_resume(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = resume_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run resume binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_json(config_path: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, success) = run_resume(config_path, args);
    assert!(success, "{:?} failed: stdout={}, stderr={}", args, stdout, stderr);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("not JSON ({}): {}", e, stdout))
}

#[test]
fn test_ask_prints_cited_answer() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_resume(&config_path, &["ask", "What revenue impact did they drive?"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.starts_with("• Generated $5M new revenue [key_metrics]"));
    assert!(stdout.contains("Sections: key_metrics"));
    assert!(stdout.contains("Source: get_metrics_and_impact"));
}

#[test]
fn test_ask_json_report() {
    let (_tmp, config_path) = setup_test_env();

    let report = run_json(&config_path, &["ask", "Does this person hold any patents?", "--json"]);
    assert_eq!(report["answer"]["text"], "• Not evidenced in the resume");
    assert_eq!(report["answer"]["metadata"]["has_evidence"], false);
    assert_eq!(report["answer"]["metadata"]["bullet_count"], 1);
    assert!(report["source"].is_null());
}

#[test]
fn test_search_and_company() {
    let (_tmp, config_path) = setup_test_env();

    let out = run_json(&config_path, &["search", "launched"]);
    assert_eq!(out["results_count"], 2);

    let out = run_json(&config_path, &["company", "casper"]);
    assert_eq!(out["company"], "Casper");
    assert_eq!(out["title"], "Technical Product Manager");

    let out = run_json(&config_path, &["company", "Initech"]);
    assert_eq!(out["error"], "No experience found at company: Initech");
}

#[test]
fn test_skill_search() {
    let (_tmp, config_path) = setup_test_env();

    let out = run_json(&config_path, &["skill", "fintech"]);
    assert_eq!(out["count"], 2);
    assert_eq!(out["matches"][0]["type"], "skill");
    assert_eq!(out["matches"][1]["type"], "experience");
    assert_eq!(out["matches"][1]["company"], "Stash");
}

#[test]
fn test_tenure() {
    let (_tmp, config_path) = setup_test_env();

    let out = run_json(&config_path, &["tenure"]);
    assert_eq!(out["roles_held"], 4);
    assert_eq!(out["companies_worked"], 3);
    assert_eq!(out["career_progression"][0]["company"], "Justworks");
}

#[test]
fn test_tenure_parse_failure_fails_command() {
    let text = fs::read_to_string(fixture("data/resume_data.json")).unwrap();
    let broken = text.replace("06/2015 - 05/2018", "mid 2015 onwards");
    let (_tmp, config_path) = setup_with_resume(&broken);

    let (_, stderr, success) = run_resume(&config_path, &["tenure"]);
    assert!(!success);
    assert!(stderr.contains("mid 2015 onwards"), "stderr={}", stderr);
}

#[test]
fn test_missing_required_field_fails_fast() {
    let text = fs::read_to_string(fixture("data/resume_data.json")).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
    value.as_object_mut().unwrap().remove("education");
    let (_tmp, config_path) = setup_with_resume(&value.to_string());

    let (_, stderr, success) = run_resume(&config_path, &["ai"]);
    assert!(!success);
    assert!(stderr.contains("education"), "stderr={}", stderr);
}

#[test]
fn test_show_resources() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_resume(&config_path, &["show", "contact"]);
    assert!(success);
    assert!(stdout.contains("Name: Jordan Avery"));

    let (stdout, _, success) = run_resume(&config_path, &["show", "skills", "cooking"]);
    assert!(success);
    assert!(stdout.contains("Available categories: product_strategy"));

    let (_, _, success) = run_resume(&config_path, &["show", "hobbies"]);
    assert!(!success);
}

#[test]
fn test_prompt_rendering() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_resume(
        &config_path,
        &["prompt", "generate_cover_letter_points", "company=Acme", "role=AI PM"],
    );
    assert!(success);
    assert!(stdout.contains("Jordan Avery applying to AI PM at Acme."));

    let (_, stderr, success) = run_resume(&config_path, &["prompt", "interview_question"]);
    assert!(!success);
    assert!(stderr.contains("topic"));
}

#[test]
fn test_tools_lists_builtins() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_resume(&config_path, &["tools"]);
    assert!(success);
    for name in [
        "search_experience",
        "get_ai_ml_experience",
        "get_metrics_and_impact",
        "search_by_skill",
        "get_company_details",
        "calculate_total_experience",
        "log_query",
        "get_analytics_summary",
        "answer_question",
    ] {
        assert!(stdout.contains(name), "missing {}", name);
    }
}

#[test]
fn test_eval_writes_results() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_resume(&config_path, &["eval", "--quiet"]);
    assert!(success, "eval failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Passed: 14/15"));
    assert!(stdout.contains("All evaluation criteria met"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("eval_results.json")).unwrap()).unwrap();
    assert_eq!(saved["detailed_results"].as_array().map(Vec::len), Some(15));
    assert!(saved["metrics"]["mrr"].as_f64().unwrap() > 0.8);
}

#[test]
fn test_eval_unmet_criteria_exits_nonzero() {
    let (tmp, config_path) = setup_test_env();
    let strict = tmp.path().join("strict.json");
    let text = fs::read_to_string(tmp.path().join("questions.json")).unwrap();
    fs::write(&strict, text.replace("\"retrieval_at_1\": 0.8", "\"retrieval_at_1\": 1.0")).unwrap();

    let (stdout, _, success) = run_resume(
        &config_path,
        &["eval", "--quiet", "--questions", strict.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stdout.contains("Some criteria not met"));
}

#[test]
fn test_eval_answers_scores_keywords() {
    let (tmp, config_path) = setup_test_env();
    let cases = tmp.path().join("answers.json");
    fs::write(
        &cases,
        r#"{"cases": [
          {"query": "What revenue impact did they drive?", "category": "metrics",
           "expected_keywords": ["$5M", "$4M", "$20M"]},
          {"query": "What AI/ML models have they built?", "category": "ai_ml",
           "expected_keywords": ["92%", "Claude Code"]},
          {"query": "Does this person hold any patents?", "category": "other",
           "expected_keywords": ["patent"], "min_score": 0.5}
        ]}"#,
    )
    .unwrap();
    let output = tmp.path().join("answer_results.json");

    let (stdout, stderr, success) = run_resume(
        &config_path,
        &[
            "eval",
            "--answers",
            "--questions",
            cases.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    );
    assert!(success, "eval --answers failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Overall Pass Rate: 67% (2/3)"));
    assert!(stderr.contains("[3/3] FAIL"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved["total_tests"], 3);
    assert_eq!(saved["detailed_results"][2]["missing_keywords"][0], "patent");
}

#[test]
fn test_bundled_answer_cases_run() {
    let (tmp, config_path) = setup_test_env();
    let output = tmp.path().join("bundled_answers.json");
    let cases = fixture("eval/answer_keywords.json");

    let (stdout, stderr, success) = run_resume(
        &config_path,
        &[
            "eval",
            "--answers",
            "--quiet",
            "--questions",
            cases.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    );
    assert!(success, "stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Overall Pass Rate"));
    assert!(output.exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let (tmp, _) = setup_test_env();
    let bad = tmp.path().join("bad.toml");
    fs::write(&bad, "[resume]\npath = \"x.json\"\n[answer]\nmax_bullets = 0\n").unwrap();

    let (_, stderr, success) = run_resume(&bad, &["tenure"]);
    assert!(!success);
    assert!(stderr.contains("answer.max_bullets"));
}
