#![deny(missing_docs)]

//! # Doctest CLI
//!
//! Runs the jest API test suite, then turns the captured exchanges into
//! OpenAPI documentation.

use clap::error::ErrorKind;
use clap::Parser;
use doctest_core::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::error::CliResult;
use crate::runner::{NodeRunner, RunOptions};

mod error;
mod runner;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generate API documentation from API tests")]
struct Cli {
    /// The location of the configuration file that doctest will use.
    #[clap(long = "doctestConfig", value_name = "PATH")]
    doctest_config: Option<PathBuf>,

    /// The location of the configuration file that jest will use.
    #[clap(long = "jestConfig", value_name = "PATH")]
    jest_config: Option<PathBuf>,

    /// Run jest without using its cache.
    #[clap(long = "noCache", alias = "no-cache")]
    no_cache: bool,

    /// Output format (swagger, openapi, sphinx); replaces the configured formats.
    #[clap(long)]
    format: Option<OutputFormat>,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        Self {
            doctest_config: cli.doctest_config,
            jest_config: cli.jest_config,
            no_cache: cli.no_cache,
            format: cli.format,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn execute(cli: Cli) -> CliResult<()> {
    let working_dir = std::env::current_dir()?;
    runner::run(&RunOptions::from(cli), &working_dir, &NodeRunner)?;
    Ok(())
}

/// Parses the arguments. On failure the usage message is printed and the
/// process exit code returned: 0 for `--help` and `--version`, 1 otherwise.
fn parse_args<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        }
    })
}

fn main() -> ExitCode {
    init_tracing();
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_camel_case_flags() {
        let cli = Cli::try_parse_from([
            "doctest",
            "--doctestConfig",
            "conf/doctest.json",
            "--jestConfig",
            "jest.config.js",
            "--noCache",
            "--format",
            "openapi",
        ])
        .unwrap();

        let options = RunOptions::from(cli);
        assert_eq!(options.doctest_config, Some(PathBuf::from("conf/doctest.json")));
        assert_eq!(options.jest_config, Some(PathBuf::from("jest.config.js")));
        assert!(options.no_cache);
        assert_eq!(options.format, Some(OutputFormat::Swagger));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["doctest", "--format", "pdf"]).is_err());
        assert!(!Cli::try_parse_from(["doctest"]).unwrap().no_cache);
    }

    #[test]
    fn test_usage_errors_exit_with_failure() {
        assert_eq!(parse_args(["doctest", "--format", "pdf"]).unwrap_err(), 1);
        assert_eq!(parse_args(["doctest", "--unknown"]).unwrap_err(), 1);
        assert_eq!(parse_args(["doctest", "--help"]).unwrap_err(), 0);
        assert_eq!(parse_args(["doctest", "--version"]).unwrap_err(), 0);
        assert!(parse_args(["doctest", "--noCache"]).unwrap().no_cache);
    }
}
