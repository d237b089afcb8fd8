use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    checker::checker::{CheckerOutcome, TypeChecker},
    config::Config,
    document::document::{discover_documents, extract_lambda, read_document},
    errors::errors::VerifyError,
    purity::purity::{validate_purity, Violation},
    signatures::signatures::parse_operations,
    stub::stub::synthesize,
};

/// Why a note contributed nothing to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoOperations,
    NoLambda,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::NoOperations => "no typed operations",
            SkipReason::NoLambda => "no lambda representation",
        }
    }
}

/// Purity result for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Nothing to verify in this note.
    NotApplicable(SkipReason),
    Violations(Vec<Violation>),
    Clean,
}

/// Everything the pipeline derives from a single note.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
    /// Present whenever the note has both operations and a lambda block.
    pub stub: Option<String>,
}

/// Result of a run that got as far as the purity gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Purity violations were found; the checker did not run.
    Rejected(Vec<Violation>),
    Checked {
        documents: usize,
        outcome: CheckerOutcome,
    },
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Rejected(_) => 1,
            Verdict::Checked { outcome, .. } => outcome.exit_code,
        }
    }
}

pub struct Verifier<'a, C: TypeChecker> {
    config: &'a Config,
    checker: C,
}

impl<'a, C: TypeChecker> Verifier<'a, C> {
    pub fn new(config: &'a Config, checker: C) -> Self {
        Verifier { config, checker }
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Parses, validates and synthesizes the stub for one note.
    pub fn inspect(&self, path: &Path, text: &str) -> DocumentReport {
        let (operations, names) = parse_operations(text, &self.config.signature_marker);
        let block = extract_lambda(text, &self.config.lambda_heading);

        let skip = if operations.is_empty() {
            Some(SkipReason::NoOperations)
        } else if block.is_empty() {
            Some(SkipReason::NoLambda)
        } else {
            None
        };

        if let Some(reason) = skip {
            debug!("skipping {}: {}", path.display(), reason.describe());
            return DocumentReport {
                path: path.to_path_buf(),
                outcome: DocumentOutcome::NotApplicable(reason),
                stub: None,
            };
        }

        let violations = validate_purity(&block.code, &path.display().to_string());
        let outcome = if violations.is_empty() {
            DocumentOutcome::Clean
        } else {
            DocumentOutcome::Violations(violations)
        };

        let mut referenced = names;
        referenced.extend(block.tokens);
        let stub = synthesize(&operations, &referenced, &block.code);

        DocumentReport {
            path: path.to_path_buf(),
            outcome,
            stub: Some(stub),
        }
    }

    /// Verifies the notes found under `paths`.
    ///
    /// Every violation of every note is collected before the gate; any
    /// violation rejects the whole batch without running the checker.
    pub fn run(&self, paths: &[PathBuf]) -> Result<Verdict, VerifyError> {
        let documents = discover_documents(paths, &self.config.document_filename)?;
        if documents.is_empty() {
            return Err(VerifyError::NoFilesFound);
        }
        info!("discovered {} document(s)", documents.len());

        let mut violations = vec![];
        let mut modules = BTreeMap::new();

        for document in &documents {
            let text = read_document(document)?;
            let report = self.inspect(document, &text);

            if let DocumentOutcome::Violations(found) = report.outcome {
                violations.extend(found);
            }
            if let Some(stub) = report.stub {
                modules.insert(report.path, stub);
            }
        }

        if modules.is_empty() {
            return Err(VerifyError::NoLambdaRepresentations);
        }

        if !violations.is_empty() {
            info!("{} purity violation(s), skipping type check", violations.len());
            return Ok(Verdict::Rejected(violations));
        }

        let outcome = self.checker.check(&modules)?;
        info!("verified {} document(s)", modules.len());

        Ok(Verdict::Checked {
            documents: modules.len(),
            outcome,
        })
    }
}
