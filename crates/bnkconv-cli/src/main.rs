use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use bnkconv_core::{BankError, ConvertError, SourceError};
use clap::Parser;
use glob::glob;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BNKCONV_BUILD_COMMIT"),
    " ",
    env!("BNKCONV_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "bnkconv")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Convert an instrument bank (.bnk) into PROGMEM byte arrays for OPL2 firmware.",
    long_about = None,
    after_help = "Examples:\n  bnkconv standard.bnk > instruments.h\n  RUST_LOG=debug bnkconv 'banks/drum*.bnk'"
)]
struct Cli {
    /// Path to the bank file (a glob matching exactly one file is accepted)
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cmd_convert(&cli.input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        let hint = match &err {
            ConvertError::Source(SourceError::NotFound { .. }) => {
                "pass the path to an existing .bnk file"
            }
            ConvertError::Source(SourceError::Io { .. }) => "check the file permissions",
            ConvertError::Bank(BankError::Truncated { .. })
            | ConvertError::Bank(BankError::OffsetOverflow { .. }) => {
                "the file is shorter than its header declares; it may be truncated or not a bank"
            }
            ConvertError::Bank(BankError::Unrepresentable { .. }) => {
                "the instrument record holds out-of-range parameter values"
            }
        };
        CliError::new(err.to_string(), Some(hint.to_string()))
    }
}

fn cmd_convert(input: &Path) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;

    let rendered = bnkconv_core::convert_bank_file(&resolved_input)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write output")?;
    Ok(())
}

// Missing files are reported by the core as `SourceError::NotFound`.
fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if input.is_dir() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the path to a .bnk file, not a directory".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) || input.exists() {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single bank file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
