use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &Path, baseline: &str) -> std::path::PathBuf {
    let yaml = format!(
        r#"
run_id: "from_file"
matches:
  seed: 7
  games: 4
agents:
  - name: "red"
    kind: "always_red"
  - name: "contrarian"
    kind: "contrarian"
outputs:
  jsonl: "{out}/{{run_id}}/matches.jsonl"
  summary_md: "{out}/{{run_id}}/summary.md"
metrics:
  baseline: "{baseline}"
"#,
        out = dir.display(),
    );
    let path = dir.join("bench.yaml");
    fs::write(&path, yaml).expect("config written");
    path
}

#[test]
fn validate_only_skips_the_tournament() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), "red");

    Command::cargo_bin("cardguess-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("from_file").exists());
}

#[test]
fn overrides_apply_before_running() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), "red");

    Command::cargo_bin("cardguess-bench")
        .expect("binary built")
        .args(["--run-id", "cli_run", "--games", "2", "--rounds", "15", "--seed", "3"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 pairings → 2 matches, 4 rows"));

    let jsonl = fs::read_to_string(dir.path().join("cli_run").join("matches.jsonl"))
        .expect("jsonl written under overridden run id");
    assert_eq!(jsonl.lines().count(), 4);
    assert!(dir.path().join("cli_run").join("summary.md").exists());
}

#[test]
fn unknown_baseline_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), "nobody");

    Command::cargo_bin("cardguess-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("metrics.baseline"));
}
