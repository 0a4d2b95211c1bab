//! Integration tests for the CLI application
//!
//! These tests run the compiled binary against LibSVM files written to
//! temporary locations.

use std::fs;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Training and test files for a linearly separable problem
struct TestDataFiles {
    pub train_file: NamedTempFile,
    pub test_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        let mut train_file = NamedTempFile::new()?;
        writeln!(train_file, "+1 1:2.0 2:1.0")?;
        writeln!(train_file, "-1 1:-2.0 2:-1.0")?;
        writeln!(train_file, "+1 1:1.5 2:0.8")?;
        writeln!(train_file, "-1 1:-1.5 2:-0.8")?;
        writeln!(train_file, "+1 1:1.8 2:0.9")?;
        writeln!(train_file, "-1 1:-1.8 2:-0.9")?;
        train_file.flush()?;

        let mut test_file = NamedTempFile::new()?;
        writeln!(test_file, "+1 1:1.6 2:0.7")?;
        writeln!(test_file, "-1 1:-1.6 2:-0.7")?;
        writeln!(test_file, "+1 1:0.9 2:1.2")?;
        writeln!(test_file, "-1 1:-1.1 2:-0.2")?;
        test_file.flush()?;

        Ok(TestDataFiles {
            train_file,
            test_file,
        })
    }

    fn train(&self) -> &str {
        self.train_file.path().to_str().expect("utf-8 temp path")
    }

    fn test(&self) -> &str {
        self.test_file.path().to_str().expect("utf-8 temp path")
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svm-session"))
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_backends_command() {
    let output = run(&["backends"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LIGHT\tSVMLight\tavailable"));
    assert!(stdout.contains("CPLEX\tSVMCplex\tdisabled"));
    assert!(stdout.contains("MPI\tSVMMPI\tdisabled"));
}

#[test]
fn test_cli_train_command() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let output = run(&["train", "--train", data.train(), "-C", "1.0", "--max-iterations", "100"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Training set:"));
    assert!(stdout.contains("\tcorrect:6\n"));
    assert!(stdout.contains("of 6 samples"));
}

#[test]
fn test_cli_test_to_stdout() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let output = run(&["test", "--train", data.train(), "--test", data.test()]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    // four result lines, then the summary block
    assert!(lines[0].ends_with("(+1)"), "unexpected line {:?}", lines[0]);
    assert!(lines[1].ends_with("(-1)"), "unexpected line {:?}", lines[1]);
    assert_eq!(lines[4], "classified:");
    assert!(stdout.contains("of 4 samples"));
    assert_eq!(stdout.matches("classified:").count(), 1);
    assert_eq!(lines.len(), 8);
}

#[test]
fn test_cli_test_with_files() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let results = temp_dir.path().join("results.txt");
    let roc = temp_dir.path().join("roc.txt");
    let report = temp_dir.path().join("report.json");

    let output = run(&[
        "test",
        "--train",
        data.train(),
        "--test",
        data.test(),
        "--kernel",
        "rbf:0.5",
        "--preproc",
        "minmax",
        "--output",
        results.to_str().unwrap(),
        "--roc",
        roc.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ]);
    assert_success(&output);

    let results = fs::read_to_string(&results).expect("results written");
    assert_eq!(results.lines().count(), 4);
    let roc = fs::read_to_string(&roc).expect("roc written");
    assert_eq!(roc.lines().count(), 4);
    assert_eq!(roc.lines().next().unwrap().split('\t').count(), 3);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report written"))
            .expect("report is JSON");
    assert_eq!(report["metadata"]["backend"], "LIGHT");
    assert_eq!(report["metadata"]["kernel"], "rbf:0.5");
    assert_eq!(report["metadata"]["preprocessor"], "minmax");
    assert_eq!(report["summary"]["total"], 4);

    // results went to the file, only the summary to stdout
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("classified:"));
    assert_eq!(stdout.matches("classified:").count(), 1);
}

#[test]
fn test_cli_disabled_backend_fails() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let output = run(&["train", "--train", data.train(), "--backend", "CPLEX"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CPLEX SVM disabled"), "stderr: {stderr}");
}

#[test]
fn test_cli_unknown_backend_fails() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let output = run(&["train", "--train", data.train(), "--backend", "light"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown svm backend"), "stderr: {stderr}");
}

#[test]
fn test_cli_missing_file_fails() {
    let output = run(&["train", "--train", "/nonexistent/train.svm"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_config_file() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let mut config = NamedTempFile::new().expect("Failed to create config");
    write!(
        config,
        r#"{{ "backend": "LIGHT", "c": 5.0, "kernel": {{ "type": "poly", "degree": 2 }} }}"#
    )
    .unwrap();

    let output = run(&[
        "train",
        "--train",
        data.train(),
        "--config",
        config.path().to_str().unwrap(),
    ]);
    assert_success(&output);
}
