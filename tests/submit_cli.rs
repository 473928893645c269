use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FAKE_LM: &str = r#"sh -c 'cat >/dev/null; printf "%s for review" "$REVIEW_ENRICH_KIND"'"#;

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn write_config(dir: &Path, command: &str) -> PathBuf {
    let config_path = dir.join("config.json");
    let config = serde_json::json!({
        "schema_version": 1,
        "enrichment": {"backend": "command", "command": command},
        "store": {"backend": "sqlite", "path": dir.join("reviews.sqlite")},
        "max_review_chars": 500
    });
    let text = serde_json::to_string_pretty(&config).expect("serialize config");
    std::fs::write(&config_path, text).expect("write config");
    config_path
}

fn run(args: &[&str], config_path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_review-enrich"))
        .args(args)
        .arg("--config")
        .arg(config_path)
        .env_remove("RUST_LOG")
        .env_remove("REVIEW_ENRICH_COMMAND")
        .output()
        .expect("run review-enrich")
}

fn list_json(config_path: &Path) -> Vec<serde_json::Value> {
    let output = run(&["list", "--json"], config_path);
    assert!(output.status.success(), "list failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("parse list JSON")
}

#[test]
fn submit_enriches_and_stores_review() {
    if find_in_path("sh").is_none() {
        return;
    }
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let config_path = write_config(temp_dir.path(), FAKE_LM);

    let output = run(
        &["submit", "--rating", "4", "--text", "  Great coffee, slow service  "],
        &config_path,
    );
    assert!(output.status.success(), "submit failed: {output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "response for review"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Review submitted successfully!"), "{stderr}");

    let reviews = list_json(&config_path);
    assert_eq!(reviews.len(), 1);
    let review = &reviews[0];
    assert_eq!(review["rating"], 4);
    assert_eq!(review["review"], "Great coffee, slow service");
    assert_eq!(review["ai_response"], "response for review");
    assert_eq!(review["ai_summary"], "summary for review");
    assert_eq!(review["ai_recommended_actions"], "actions for review");
    assert!(review["created_at"].is_string());
}

#[test]
fn submit_without_rating_fails_and_stores_nothing() {
    if find_in_path("sh").is_none() {
        return;
    }
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let config_path = write_config(temp_dir.path(), FAKE_LM);

    let output = run(&["submit", "--text", "Lovely staff"], &config_path);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please select a star rating"), "{stderr}");

    assert!(list_json(&config_path).is_empty());
}

#[test]
fn failing_lm_command_reports_its_stderr() {
    if find_in_path("sh").is_none() {
        return;
    }
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "sh -c 'cat >/dev/null; echo model offline >&2; exit 3'",
    );

    let output = run(&["submit", "--rating", "2", "--text", "Cold food"], &config_path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("model offline"), "{stderr}");

    assert!(list_json(&config_path).is_empty());
}
