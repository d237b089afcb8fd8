use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{errors::errors::VerifyError, signatures::types::IDENTIFIER};

lazy_static! {
    static ref FENCE: Regex =
        Regex::new(r"^\s*(`{3,}|~{3,})\s*([\w+.-]*)\s*$").expect("fence pattern must compile");
}

/// The composition code of one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LambdaBlock {
    /// Inner text of the fenced block, one `\n` after every line.
    pub code: String,
    /// Every identifier-shaped substring of `code`.
    pub tokens: BTreeSet<String>,
}

impl LambdaBlock {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Level of a markdown heading line, or `None` for other lines.
pub fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return None;
    }

    match trimmed[level..].chars().next() {
        None => Some(level),
        Some(c) if c.is_whitespace() => Some(level),
        _ => None,
    }
}

/// Opening or closing fence marker of a line, if it is one.
fn fence_marker(line: &str) -> Option<&str> {
    FENCE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|marker| marker.as_str())
}

/// Lines of the section introduced by `marker`, up to the next heading of the
/// same or a higher level. Headings inside fenced blocks do not end it.
pub fn section_lines<'a>(text: &'a str, marker: &str) -> Option<Vec<&'a str>> {
    let marker = marker.trim();
    let mut lines = text.lines();

    lines.by_ref().find(|line| line.trim().starts_with(marker))?;

    let level = heading_level(marker).unwrap_or(usize::MAX);
    let mut open_fence: Option<String> = None;
    let mut section = vec![];

    for line in lines {
        match (&open_fence, fence_marker(line)) {
            (None, Some(marker)) => open_fence = Some(marker.to_string()),
            (Some(open), Some(marker)) if marker.starts_with(open.as_str()) => open_fence = None,
            (None, None) => {
                if let Some(found) = heading_level(line) {
                    if found <= level {
                        break;
                    }
                }
            }
            _ => {}
        }
        section.push(line);
    }

    Some(section)
}

/// Extracts the first fenced block of the section introduced by `heading`.
///
/// Prose may sit between the heading and the fence, and the fence may carry
/// a language tag. A missing section, a missing or unterminated block, or a
/// blank body all yield an empty `LambdaBlock`.
pub fn extract_lambda(text: &str, heading: &str) -> LambdaBlock {
    let section = match section_lines(text, heading) {
        Some(section) => section,
        None => return LambdaBlock::default(),
    };

    let mut lines = section.into_iter();
    let open = match lines.by_ref().find_map(fence_marker) {
        Some(open) => open.to_string(),
        None => return LambdaBlock::default(),
    };

    let mut body = vec![];
    let mut closed = false;
    for line in lines {
        if let Some(marker) = fence_marker(line) {
            if marker.starts_with(open.as_str()) {
                closed = true;
                break;
            }
        }
        body.push(line);
    }

    if !closed || body.iter().all(|line| line.trim().is_empty()) {
        return LambdaBlock::default();
    }

    let mut code = body.join("\n");
    code.push('\n');

    let tokens = IDENTIFIER
        .find_iter(&code)
        .map(|found| found.as_str().to_string())
        .collect();

    LambdaBlock { code, tokens }
}

/// Expands the given paths into the list of notes to verify.
///
/// Files are taken as they are; directories are walked recursively for files
/// named `filename`, in sorted order. Any other path is an error.
pub fn discover_documents(paths: &[PathBuf], filename: &str) -> Result<Vec<PathBuf>, VerifyError> {
    let mut documents = vec![];

    for path in paths {
        if path.is_file() {
            documents.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(error) => {
                        warn!("skipping unreadable entry: {}", error);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file() && entry.file_name() == filename)
                .map(|entry| entry.into_path())
                .collect();
            found.sort();

            debug!("found {} document(s) under {}", found.len(), path.display());
            documents.extend(found);
        } else {
            return Err(VerifyError::NotFound { path: path.clone() });
        }
    }

    Ok(documents)
}

pub fn read_document(path: &Path) -> Result<String, VerifyError> {
    fs::read_to_string(path).map_err(|source| VerifyError::Io {
        path: path.to_path_buf(),
        source,
    })
}
