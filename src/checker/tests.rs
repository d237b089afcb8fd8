use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use crate::{config::CheckerConfig, errors::errors::VerifyError};

use super::checker::{scratch_file_name, ExternalChecker, TypeChecker};

fn modules() -> BTreeMap<PathBuf, String> {
    let mut modules = BTreeMap::new();
    modules.insert(PathBuf::from("tasks/a1/notes.md"), String::from("first = 1\n"));
    modules.insert(PathBuf::from("tasks/b2/notes.md"), String::from("second = 2\n"));
    modules
}

#[test]
fn test_scratch_file_name() {
    let mut taken = HashSet::new();

    assert_eq!(scratch_file_name(Path::new("tasks/a1/notes.md"), &mut taken), "a1_notes.py");
    assert_eq!(scratch_file_name(Path::new("tasks/b-2/my notes.md"), &mut taken), "b_2_my_notes.py");
    assert_eq!(scratch_file_name(Path::new("7f/notes.md"), &mut taken), "_7f_notes.py");
    assert_eq!(scratch_file_name(Path::new("notes.md"), &mut taken), "_notes.py");
}

#[test]
fn test_scratch_file_name_clash() {
    let mut taken = HashSet::new();

    assert_eq!(scratch_file_name(Path::new("x/a-b/notes.md"), &mut taken), "a_b_notes.py");
    assert_eq!(scratch_file_name(Path::new("y/a_b/notes.md"), &mut taken), "a_b_notes_2.py");
    assert_eq!(scratch_file_name(Path::new("z/a.b/notes.md"), &mut taken), "a_b_notes_3.py");
}

#[test]
fn test_from_config() {
    let checker = ExternalChecker::from_config(&CheckerConfig::default());

    assert_eq!(checker.program(), "mypy");
}

#[test]
fn test_launch_failure() {
    let checker = ExternalChecker::new("lambda-verify-no-such-checker", vec![]);
    let error = checker.check(&modules()).unwrap_err();

    assert!(matches!(error, VerifyError::CheckerLaunch { program, .. } if program == "lambda-verify-no-such-checker"));
}

#[cfg(unix)]
fn shell(script: &str) -> ExternalChecker {
    ExternalChecker::new(
        "sh",
        vec!["-c".to_string(), script.to_string(), "checker".to_string()],
    )
}

#[cfg(unix)]
#[test]
fn test_runs_once_over_all_modules() {
    let outcome = shell("echo \"$#\"; cat \"$@\"; echo diagnostics >&2")
        .check(&modules())
        .unwrap();

    assert!(outcome.success());
    assert_eq!(outcome.output, "2\nfirst = 1\nsecond = 2\ndiagnostics\n");
}

#[cfg(unix)]
#[test]
fn test_propagates_exit_code() {
    let outcome = shell("echo 'a1_notes.py:1: error: boom'; exit 3")
        .check(&modules())
        .unwrap();

    assert_eq!(outcome.exit_code, 3);
    assert!(!outcome.success());
    assert_eq!(outcome.output, "a1_notes.py:1: error: boom\n");
}

#[cfg(unix)]
#[test]
fn test_signal_reports_failure() {
    let outcome = shell("kill -9 $$").check(&modules()).unwrap();

    assert_eq!(outcome.exit_code, 1);
}

#[cfg(unix)]
#[test]
fn test_scratch_directory_is_removed() {
    let outcome = shell("for f in \"$@\"; do echo \"$f\"; done").check(&modules()).unwrap();
    let files: Vec<PathBuf> = outcome.output.lines().map(PathBuf::from).collect();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name().unwrap(), "a1_notes.py");
    assert_eq!(files[1].file_name().unwrap(), "b2_notes.py");
    assert_eq!(files[0].parent(), files[1].parent());

    for file in &files {
        assert!(!file.exists());
    }
    assert!(!files[0].parent().unwrap().exists());
}

#[cfg(unix)]
#[test]
fn test_scratch_directory_is_removed_on_failure() {
    let outcome = shell("for f in \"$@\"; do echo \"$f\"; done; exit 1")
        .check(&modules())
        .unwrap();
    let file = PathBuf::from(outcome.output.lines().next().unwrap());

    assert_eq!(outcome.exit_code, 1);
    assert!(!file.parent().unwrap().exists());
}
