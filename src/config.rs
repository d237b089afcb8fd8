//! Configuration management

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "lambda-verify.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// File name looked for when a directory is given
    #[serde(default = "default_document_filename")]
    pub document_filename: String,

    /// Line introducing the operation signatures
    #[serde(default = "default_signature_marker")]
    pub signature_marker: String,

    /// Heading of the section holding the lambda block
    #[serde(default = "default_lambda_heading")]
    pub lambda_heading: String,

    /// External type checker
    #[serde(default)]
    pub checker: CheckerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckerConfig {
    /// Program to run
    #[serde(default = "default_checker_program")]
    pub program: String,

    /// Arguments placed before the stub files
    #[serde(default = "default_checker_args")]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_filename: default_document_filename(),
            signature_marker: default_signature_marker(),
            lambda_heading: default_lambda_heading(),
            checker: CheckerConfig::default(),
        }
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            program: default_checker_program(),
            args: default_checker_args(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// An explicit path must exist. Without one, `lambda-verify.toml` in the
    /// working directory is used when present, and the defaults otherwise.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_owned(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// Default value functions
fn default_document_filename() -> String {
    "notes.md".to_string()
}

fn default_signature_marker() -> String {
    "## DSL Operations".to_string()
}

fn default_lambda_heading() -> String {
    "## Lambda Representation".to_string()
}

fn default_checker_program() -> String {
    "mypy".to_string()
}

fn default_checker_args() -> Vec<String> {
    vec![
        "--show-error-codes".to_string(),
        "--show-column-numbers".to_string(),
    ]
}
