use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Result};
use clap::Parser;
use lambda_verify::{
    checker::checker::ExternalChecker,
    config::Config,
    verifier::verifier::{Verdict, Verifier},
};
use tracing::debug;

/// Checks the lambda representations of documentation notes against their
/// declared operation signatures.
#[derive(Parser)]
#[command(name = "lambda-verify")]
#[command(about = "Verify lambda representations against typed DSL operations")]
#[command(version)]
struct Cli {
    /// Note files, or directories to search for notes
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Type checker program, overriding the configuration
    #[arg(long)]
    checker: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match init_logging(cli.verbose).and_then(|_| run(cli)) {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

/// Process status for a verdict code; codes outside `0..=255` report failure.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(program) = cli.checker {
        config.checker.program = program;
    }
    debug!("using configuration {:?}", config);

    let verifier = Verifier::new(&config, ExternalChecker::from_config(&config.checker));
    let verdict = verifier.run(&cli.paths)?;

    match &verdict {
        Verdict::Rejected(violations) => {
            for violation in violations {
                println!("{}", violation);
            }
        }
        Verdict::Checked { outcome, .. } => print!("{}", outcome.output),
    }

    Ok(verdict.exit_code())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!(error))
}

#[cfg(test)]
mod tests {
    use super::exit_status;

    #[test]
    fn test_exit_status_keeps_checker_codes() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(1), 1);
        assert_eq!(exit_status(2), 2);
        assert_eq!(exit_status(255), 255);
    }

    #[test]
    fn test_exit_status_out_of_range_is_failure() {
        assert_eq!(exit_status(-1), 1);
        assert_eq!(exit_status(256), 1);
    }
}
