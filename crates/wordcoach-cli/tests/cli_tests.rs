//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wordcoach() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("wordcoach").unwrap();
    // Keep a developer's own config and keys out of the tests.
    cmd.env("HOME", std::env::temp_dir())
        .env_remove("WORDCOACH_GEMINI_KEY")
        .env_remove("AI_GATEWAY_API_KEY")
        .env_remove("WORDCOACH_OPENAI_KEY");
    cmd
}

#[test]
fn score_perfect_match() {
    wordcoach()
        .args(["score", "--transcript", "Dog!", "--target", "dog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 10/10 (perfect)"))
        .stdout(predicate::str::contains("Perfect pronunciation!"));
}

#[test]
fn score_wrong_word_tip_names_both_words() {
    wordcoach()
        .args(["score", "--transcript", "xyz", "--target", "dog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3/10 (wrong_word)"))
        .stdout(predicate::str::contains(
            "Tip: You said \"xyz\". Try saying \"dog\".",
        ));
}

#[test]
fn score_json_output() {
    let output = wordcoach()
        .args(["score", "--transcript", "kat", "--target", "cat", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let verdict: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(verdict["score"], 9);
    assert_eq!(verdict["tier"], "close");
    assert_eq!(verdict["transcript"], "kat");
}

#[test]
fn score_uses_configured_scores() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("wordcoach.toml");
    std::fs::write(&config, "[scoring.scores]\nclose = 8\n").unwrap();

    wordcoach()
        .args(["score", "--transcript", "kat", "--target", "cat", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 8/10"));
}

#[test]
fn score_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("wordcoach.toml");
    std::fs::write(&config, "[scoring]\noverlap_ratio = 3.0\n").unwrap();

    wordcoach()
        .args(["score", "--transcript", "kat", "--target", "cat", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlap_ratio"));
}

#[test]
fn grade_without_provider_fails() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .current_dir(dir.path())
        .args([
            "grade",
            "--kind",
            "qa",
            "--question",
            "What is your favorite animal?",
            "--answer",
            "A dog",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'gemini' not found"));
}

#[test]
fn grade_requires_prompt_text() {
    wordcoach()
        .args(["grade", "--kind", "sentence", "--answer", "The cat is cute."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--target-word is required"));
}

#[test]
fn grade_rejects_unknown_kind() {
    wordcoach()
        .args(["grade", "--kind", "poem", "--answer", "Roses are red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exercise kind"));
}

#[test]
fn validate_lesson_file() {
    wordcoach()
        .arg("validate")
        .arg("--lesson")
        .arg("../../lessons/animals.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Animals (12 exercises)"))
        .stdout(predicate::str::contains("All lessons valid"));
}

#[test]
fn validate_directory() {
    wordcoach()
        .arg("validate")
        .arg("--lesson")
        .arg("../../lessons")
        .assert()
        .success()
        .stdout(predicate::str::contains("Animals"))
        .stdout(predicate::str::contains("Daily Activities"))
        .stdout(predicate::str::contains("Family"))
        .stdout(predicate::str::contains("Food & Drinks"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
[lesson]
id = "broken"
title = "Broken"

[[vocabulary]]
word = "Dog"

[[vocabulary]]
word = "dog"

[[completions]]
text = "There is no blank here."
answer = "blank"
"#,
    )
    .unwrap();

    wordcoach()
        .arg("validate")
        .arg("--lesson")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate vocabulary id: dog"))
        .stdout(predicate::str::contains("[complete:1] WARNING"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    wordcoach()
        .arg("validate")
        .arg("--lesson")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn practice_speaking_session() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .arg("practice")
        .arg("--lesson")
        .arg("../../lessons/animals.toml")
        .arg("--attempts")
        .arg("../../attempts/animals.toml")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Average score: 8.7/10 over 4 attempt(s), 1 failed",
        ))
        .stderr(predicate::str::contains("unknown exercise 'speak:fish'"))
        .stderr(predicate::str::contains("Results saved to"));

    let saved: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("practice-"))
        .collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn practice_writing_without_provider_records_failure() {
    let dir = TempDir::new().unwrap();
    let attempts = dir.path().join("attempts.toml");
    std::fs::write(
        &attempts,
        r#"
[[attempts]]
exercise = "speak:cat"
answer = "cat"

[[attempts]]
exercise = "qa:1"
answer = "My favorite animal is a cat."
"#,
    )
    .unwrap();

    wordcoach()
        .current_dir(dir.path())
        .arg("practice")
        .arg("--lesson")
        .arg(std::fs::canonicalize("../../lessons/animals.toml").unwrap())
        .arg("--attempts")
        .arg(&attempts)
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "no grading provider configured for writing exercises",
        ))
        .stdout(predicate::str::contains("1 failed"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created wordcoach.toml"))
        .stdout(predicate::str::contains("Created lessons/animals.toml"))
        .stdout(predicate::str::contains("Created attempts/animals.toml"));

    assert!(dir.path().join("wordcoach.toml").exists());
    assert!(dir.path().join("lessons/animals.toml").exists());

    // The generated lesson must itself be valid.
    wordcoach()
        .current_dir(dir.path())
        .args(["validate", "--lesson", "lessons"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All lessons valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    wordcoach()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_config_is_loadable() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    wordcoach()
        .current_dir(dir.path())
        .args(["score", "--transcript", "burd", "--target", "bird"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 9/10"));
}

#[test]
fn list_models_without_keys() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .current_dir(dir.path())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn list_models_with_env_key() {
    let dir = TempDir::new().unwrap();

    wordcoach()
        .current_dir(dir.path())
        .env("WORDCOACH_GEMINI_KEY", "test-key")
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: gemini"))
        .stdout(predicate::str::contains("gemini-2.0-flash"));
}

#[test]
fn compare_sessions() {
    let dir = TempDir::new().unwrap();
    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");

    std::fs::write(&baseline_path, make_test_report("speak:dog", "dawg", 7, "good")).unwrap();
    std::fs::write(&current_path, make_test_report("speak:dog", "dog", 10, "perfect")).unwrap();

    wordcoach()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 improved, 0 slipped"))
        .stdout(predicate::str::contains("speak:dog 7 -> 10 (+3)"));
}

#[test]
fn compare_fail_on_slip() {
    let dir = TempDir::new().unwrap();
    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");

    std::fs::write(&baseline_path, make_test_report("speak:dog", "dog", 10, "perfect")).unwrap();
    std::fs::write(&current_path, make_test_report("speak:dog", "xyz", 3, "wrong_word")).unwrap();

    wordcoach()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .arg("--fail-on-slip")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Slipped"));
}

#[test]
fn compare_nonexistent_report() {
    wordcoach()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn help_output() {
    wordcoach()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("young English learners"));
}

#[test]
fn version_output() {
    wordcoach()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wordcoach"));
}

/// Create a minimal valid practice report JSON with a single speaking result.
fn make_test_report(exercise_id: &str, answer: &str, score: u8, tier: &str) -> String {
    format!(
        r#"{{
    "id": "00000000-0000-0000-0000-000000000000",
    "created_at": "2025-01-01T00:00:00Z",
    "lesson": {{
        "id": "animals",
        "title": "Animals",
        "exercise_count": 12
    }},
    "results": [{{
        "exercise_id": "{exercise_id}",
        "kind": "speaking",
        "answer": "{answer}",
        "score": {score},
        "feedback": "",
        "tip": "",
        "tier": "{tier}",
        "grader": "heuristic",
        "token_usage": null,
        "latency_ms": 0
    }}],
    "failures": [],
    "summary": {{
        "attempts": 1,
        "failed": 0,
        "average_score": {score}.0,
        "per_kind": {{}},
        "tier_counts": {{}},
        "token_usage": {{
            "prompt_tokens": 0,
            "completion_tokens": 0,
            "total_tokens": 0,
            "estimated_cost_usd": 0.0
        }}
    }},
    "duration_ms": 5
}}"#
    )
}
