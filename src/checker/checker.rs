use std::{
    collections::{BTreeMap, HashSet},
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use tempfile::TempDir;
use tracing::debug;

use crate::{config::CheckerConfig, errors::errors::VerifyError};

/// Exit status and combined output of one checker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOutcome {
    pub exit_code: i32,
    pub output: String,
}

impl CheckerOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Type checks a batch of stub modules keyed by the note they came from.
pub trait TypeChecker {
    fn check(&self, modules: &BTreeMap<PathBuf, String>) -> Result<CheckerOutcome, VerifyError>;
}

/// Runs an external checker program once over every module of a batch.
///
/// Modules are written into a scratch directory that lives for the duration
/// of one `check` call and is removed when it returns, whatever the outcome.
#[derive(Debug, Clone)]
pub struct ExternalChecker {
    program: String,
    args: Vec<String>,
}

impl ExternalChecker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ExternalChecker {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CheckerConfig) -> Self {
        ExternalChecker::new(config.program.clone(), config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn write_modules(
        &self,
        scratch: &TempDir,
        modules: &BTreeMap<PathBuf, String>,
    ) -> Result<Vec<PathBuf>, VerifyError> {
        let mut taken = HashSet::new();
        let mut files = vec![];

        for (document, text) in modules {
            let file = scratch.path().join(scratch_file_name(document, &mut taken));
            fs::write(&file, text).map_err(|source| VerifyError::Io {
                path: file.clone(),
                source,
            })?;
            debug!("wrote stub for {} to {}", document.display(), file.display());
            files.push(file);
        }

        Ok(files)
    }
}

impl TypeChecker for ExternalChecker {
    fn check(&self, modules: &BTreeMap<PathBuf, String>) -> Result<CheckerOutcome, VerifyError> {
        let scratch = tempfile::Builder::new()
            .prefix("lambda-verify-")
            .tempdir()
            .map_err(|source| VerifyError::Io {
                path: env::temp_dir(),
                source,
            })?;

        let files = self.write_modules(&scratch, modules)?;

        debug!(
            "running {} {} over {} module(s)",
            self.program,
            self.args.join(" "),
            files.len()
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(&files)
            .output()
            .map_err(|source| VerifyError::CheckerLaunch {
                program: self.program.clone(),
                source,
            })?;

        // Killed by a signal
        let exit_code = output.status.code().unwrap_or(1);
        debug!("{} exited with {}", self.program, exit_code);

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CheckerOutcome {
            exit_code,
            output: text,
        })
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// File name for the stub of `document`: `<parent>_<stem>.py`, made a valid
/// module name, with a numeric suffix when an earlier document took it.
pub fn scratch_file_name(document: &Path, taken: &mut HashSet<String>) -> String {
    let stem = document
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = document
        .parent()
        .and_then(|parent| parent.file_name())
        .map(|parent| parent.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut base = sanitize(&format!("{}_{}", parent, stem));
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }

    let mut name = base.clone();
    let mut counter = 2;
    while !taken.insert(name.clone()) {
        name = format!("{}_{}", base, counter);
        counter += 1;
    }

    format!("{}.py", name)
}
