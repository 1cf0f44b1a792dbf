//! Library entry point for the `shapecheck` binary, kept separate from
//! `main.rs` so CLI behavior is directly testable (`apps/logicaffeine_cli`
//! follows the same split).

pub mod cli;
pub mod report;

use clap::Parser;
use cli::Cli;
use report::Console;
use shapecheck_ir::{decode_document, parse_document, DecodeError};
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Decode(DecodeError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "could not read document: {e}"),
            CliError::Decode(e) => write!(f, "could not decode document: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<DecodeError> for CliError {
    fn from(e: DecodeError) -> Self {
        CliError::Decode(e)
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    run(&cli)
}

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&cli.path)?;
    let document = parse_document(&text)?;
    let sets = decode_document(document)?;

    let console = Console::new(cli.silent);
    let reports = shapecheck_solve::classify_all(&sets, Duration::from_secs(cli.timeout));
    for report in &reports {
        report::narrate(&console, report);
    }
    report::summarize(&console, &reports);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_doc(json: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn runs_end_to_end_on_a_trivial_valid_path() {
        let file = write_doc(r#"[{"ctrPool":[{"type":10}],"hardCtr":[],"softCtr":[],"pathCtr":[]}]"#);
        let cli = Cli {
            path: file.path().to_path_buf(),
            silent: true,
            timeout: 5,
        };
        assert!(run(&cli).is_ok());
    }

    #[test]
    fn reports_decode_error_for_malformed_json() {
        let file = write_doc("not json");
        let cli = Cli {
            path: file.path().to_path_buf(),
            silent: true,
            timeout: 5,
        };
        assert!(matches!(run(&cli), Err(CliError::Decode(_))));
    }

    #[test]
    fn reports_io_error_for_missing_file() {
        let cli = Cli {
            path: std::path::PathBuf::from("/nonexistent/does/not/exist.json"),
            silent: true,
            timeout: 5,
        };
        assert!(matches!(run(&cli), Err(CliError::Io(_))));
    }
}
