use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    checker::checker::{CheckerOutcome, TypeChecker},
    config::Config,
    errors::errors::VerifyError,
};

use super::verifier::{DocumentOutcome, SkipReason, Verdict, Verifier};

/// Records every batch it is asked to check.
#[derive(Default)]
struct RecordingChecker {
    exit_code: i32,
    batches: RefCell<Vec<BTreeMap<PathBuf, String>>>,
}

impl TypeChecker for RecordingChecker {
    fn check(&self, modules: &BTreeMap<PathBuf, String>) -> Result<CheckerOutcome, VerifyError> {
        self.batches.borrow_mut().push(modules.clone());
        Ok(CheckerOutcome {
            exit_code: self.exit_code,
            output: String::from("checked\n"),
        })
    }
}

fn note(operations: &str, lambda: &str) -> String {
    format!(
        "# Task\n\n## DSL Operations\n\n{}\n\n## Lambda Representation\n\n```python\n{}```\n",
        operations, lambda
    )
}

const CLEAN: &str = "def f(g):\n    return move(g)\n";
const IMPURE: &str = "def f(g):\n    g.counter += 1\n    return g\n";

#[test]
fn test_inspect_clean() {
    let config = Config::default();
    let verifier = Verifier::new(&config, RecordingChecker::default());

    let report = verifier.inspect(Path::new("a/notes.md"), &note("- `move: Grid -> Grid`", CLEAN));

    assert_eq!(report.outcome, DocumentOutcome::Clean);
    let stub = report.stub.unwrap();
    assert!(stub.contains("def move(arg0: Grid) -> Grid:"));
    assert!(stub.ends_with(CLEAN));
}

#[test]
fn test_inspect_not_applicable() {
    let config = Config::default();
    let verifier = Verifier::new(&config, RecordingChecker::default());

    let report = verifier.inspect(Path::new("notes.md"), &note("No signatures yet.", CLEAN));
    assert_eq!(report.outcome, DocumentOutcome::NotApplicable(SkipReason::NoOperations));
    assert!(report.stub.is_none());

    let report = verifier.inspect(Path::new("notes.md"), "## DSL Operations\n`move: Grid -> Grid`\n");
    assert_eq!(report.outcome, DocumentOutcome::NotApplicable(SkipReason::NoLambda));
    assert!(report.stub.is_none());
}

#[test]
fn test_inspect_violations_still_synthesize() {
    let config = Config::default();
    let verifier = Verifier::new(&config, RecordingChecker::default());

    let report = verifier.inspect(Path::new("b/notes.md"), &note("`move: Grid -> Grid`", IMPURE));

    match report.outcome {
        DocumentOutcome::Violations(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].source, "b/notes.md");
            assert_eq!(violations[0].line, 2);
        }
        other => panic!("expected violations, got {:?}", other),
    }
    assert!(report.stub.is_some());
}

#[test]
fn test_inspect_uses_configured_sections() {
    let config = Config {
        signature_marker: String::from("### Ops"),
        lambda_heading: String::from("### Code"),
        ..Config::default()
    };
    let verifier = Verifier::new(&config, RecordingChecker::default());

    let text = "### Ops\n`move: Grid -> Grid`\n### Code\n```\ndef f(g):\n    return move(g)\n```\n";
    assert_eq!(verifier.inspect(Path::new("notes.md"), text).outcome, DocumentOutcome::Clean);
}

#[test]
fn test_run_gate_and_exit_codes() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("one")).unwrap();
    fs::write(dir.path().join("one/notes.md"), note("`move: Grid -> Grid`", CLEAN)).unwrap();

    let config = Config::default();
    let verifier = Verifier::new(
        &config,
        RecordingChecker {
            exit_code: 2,
            ..RecordingChecker::default()
        },
    );

    let verdict = verifier.run(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(verdict.exit_code(), 2);
    assert!(matches!(verdict, Verdict::Checked { documents: 1, .. }));
    assert_eq!(verifier.checker().batches.borrow().len(), 1);
}

#[test]
fn test_run_errors() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let verifier = Verifier::new(&config, RecordingChecker::default());

    let error = verifier.run(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(matches!(error, VerifyError::NoFilesFound));

    fs::write(dir.path().join("notes.md"), "# Just prose\n").unwrap();
    let error = verifier.run(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(matches!(error, VerifyError::NoLambdaRepresentations));

    let error = verifier.run(&[dir.path().join("missing")]).unwrap_err();
    assert!(matches!(error, VerifyError::NotFound { .. }));

    assert!(verifier.checker().batches.borrow().is_empty());
}
