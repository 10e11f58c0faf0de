#![deny(missing_docs)]

//! # Runner
//!
//! Runs the jest test suite that captures API exchanges, then gathers the AIL
//! results and renders the documentation.

use crate::error::{CliError, CliResult};
use doctest_core::config::{load_config, DEFAULT_CONFIG_PATH};
use doctest_core::{gather, generate_output, OutputFormat};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// Location of the jest entry point, relative to the working directory.
pub const JEST_BIN: &str = "node_modules/jest/bin/jest.js";

/// Interface for running the test suite.
///
/// Abstracted so tests can mock the run without node or jest installed.
pub trait TestRunner {
    /// Runs the program to completion and returns its exit status.
    fn run(&self, program: &str, args: &[String]) -> CliResult<ExitStatus>;
}

/// Runs the suite with `std::process::Command`, inheriting stdio.
pub struct NodeRunner;

impl TestRunner for NodeRunner {
    fn run(&self, program: &str, args: &[String]) -> CliResult<ExitStatus> {
        let status = Command::new(program).args(args).status()?;
        Ok(status)
    }
}

/// Options collected from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Path to `doctest.json`.
    pub doctest_config: Option<PathBuf>,
    /// Path to the jest configuration.
    pub jest_config: Option<PathBuf>,
    /// Forward `--no-cache` to jest.
    pub no_cache: bool,
    /// Replaces the configured output formats.
    pub format: Option<OutputFormat>,
}

/// Runs the tests and renders documentation for the captured results.
///
/// Relative paths are resolved against `working_dir`. Returns the files
/// written.
pub fn run<R: TestRunner>(
    options: &RunOptions,
    working_dir: &Path,
    runner: &R,
) -> CliResult<Vec<PathBuf>> {
    let config_path = working_dir.join(
        options
            .doctest_config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH)),
    );
    verify_file_exists(
        &config_path,
        "Invalid path for the doctest configuration file. File not found",
    )?;

    let mut config = load_config(&config_path)?;
    if config.results_directory.is_relative() {
        config.results_directory = working_dir.join(&config.results_directory);
    }
    if let Some(format) = options.format {
        config.output_formats = vec![format];
    }

    let jest_config = match options.jest_config.as_deref() {
        Some(path) => {
            let path = working_dir.join(path);
            verify_file_exists(
                &path,
                "Invalid path for the jest configuration file. File not found",
            )?;
            Some(path)
        }
        None => None,
    };

    let jest = working_dir.join(JEST_BIN);
    if !jest.is_file() {
        return Err(CliError::General(format!(
            "Jest is required to run doctest. Jest was not found at the expected path: {}",
            jest.display()
        )));
    }

    let args = jest_args(&jest, jest_config.as_deref(), options.no_cache);
    debug!(?args, "Running jest");
    let status = runner.run("node", &args)?;
    if !status.success() {
        return Err(CliError::General("Testing Failed.".to_string()));
    }

    info!("Testing Complete. Generating Documentation.");
    let collection = gather(&config)?;
    Ok(generate_output(&config, collection)?)
}

fn jest_args(jest: &Path, jest_config: Option<&Path>, no_cache: bool) -> Vec<String> {
    let mut args = vec![jest.display().to_string()];
    if let Some(config) = jest_config {
        args.push("-c".to_string());
        args.push(config.display().to_string());
    }
    if no_cache {
        args.push("--no-cache".to_string());
    }
    args
}

fn verify_file_exists(path: &Path, message: &str) -> CliResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::General(format!("{message}: {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctest_core::raw::{ContainerInfo, RawDocContainer, RawDocData, RawRequest, RawResponse};
    use doctest_core::{AilManager, AilManagerConfig};
    use std::cell::RefCell;
    use std::fs;
    use std::os::unix::process::ExitStatusExt;
    use tempfile::{tempdir, TempDir};

    // Mock runner that captures the command and produces AIL results on success
    struct MockRunner {
        last_command: RefCell<Option<(String, Vec<String>)>>,
        results_directory: Option<PathBuf>,
        should_fail: bool,
    }

    impl MockRunner {
        fn new(results_directory: Option<PathBuf>, should_fail: bool) -> Self {
            Self {
                last_command: RefCell::new(None),
                results_directory,
                should_fail,
            }
        }
    }

    impl TestRunner for MockRunner {
        fn run(&self, program: &str, args: &[String]) -> CliResult<ExitStatus> {
            self.last_command
                .borrow_mut()
                .replace((program.to_string(), args.to_vec()));

            if self.should_fail {
                // Exit code 1 is encoded in the high byte of a wait status.
                return Ok(ExitStatus::from_raw(1 << 8));
            }

            if let Some(dir) = &self.results_directory {
                let mut manager = AilManager::init(AilManagerConfig::file(dir))?;
                let mut container = RawDocContainer::new(ContainerInfo::new("health"));
                container.save(RawDocData::captured(
                    "/health",
                    RawRequest::new("GET", "/health"),
                    RawResponse::new(200),
                ))?;
                manager.consume_container(&mut container)?;
            }
            Ok(ExitStatus::from_raw(0))
        }
    }

    fn project() -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_PATH),
            r#"{ "storageEngine": "FILE", "resultsDirectory": "results" }"#,
        )
        .unwrap();
        let jest = dir.path().join(JEST_BIN);
        fs::create_dir_all(jest.parent().unwrap()).unwrap();
        fs::write(&jest, "").unwrap();
        dir
    }

    #[test]
    fn test_successful_run_renders_swagger() {
        let dir = project();
        fs::write(dir.path().join("jest.config.js"), "").unwrap();
        let runner = MockRunner::new(Some(dir.path().join("results")), false);
        let options = RunOptions {
            jest_config: Some(PathBuf::from("jest.config.js")),
            no_cache: true,
            ..RunOptions::default()
        };

        let written = run(&options, dir.path(), &runner).unwrap();
        assert_eq!(written, vec![dir.path().join("results/swagger.json")]);

        let (program, args) = runner.last_command.borrow().clone().unwrap();
        assert_eq!(program, "node");
        assert_eq!(
            args,
            vec![
                dir.path().join(JEST_BIN).display().to_string(),
                "-c".to_string(),
                dir.path().join("jest.config.js").display().to_string(),
                "--no-cache".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_override() {
        let dir = project();
        let runner = MockRunner::new(Some(dir.path().join("results")), false);
        let options = RunOptions {
            format: Some(OutputFormat::Sphinx),
            ..RunOptions::default()
        };

        let written = run(&options, dir.path(), &runner).unwrap();
        assert!(written.is_empty());

        let (_, args) = runner.last_command.borrow().clone().unwrap();
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_failed_tests_abort() {
        let dir = project();
        let runner = MockRunner::new(None, true);
        let err = run(&RunOptions::default(), dir.path(), &runner).unwrap_err();
        assert_eq!(err.to_string(), "Testing Failed.");
        assert!(!dir.path().join("results/swagger.json").exists());
    }

    #[test]
    fn test_no_results_is_reported() {
        let dir = project();
        fs::create_dir(dir.path().join("results")).unwrap();
        let runner = MockRunner::new(None, false);
        let err = run(&RunOptions::default(), dir.path(), &runner).unwrap_err();
        assert_eq!(err.to_string(), "No AIL results were found");
    }

    #[test]
    fn test_missing_files_are_reported() {
        let dir = tempdir().unwrap();
        let runner = MockRunner::new(None, false);

        let err = run(&RunOptions::default(), dir.path(), &runner).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Invalid path for the doctest configuration file. File not found: "));

        let dir = project();
        let options = RunOptions {
            jest_config: Some(PathBuf::from("missing.config.js")),
            ..RunOptions::default()
        };
        let err = run(&options, dir.path(), &runner).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Invalid path for the jest configuration file. File not found: "));

        fs::remove_file(dir.path().join(JEST_BIN)).unwrap();
        let err = run(&RunOptions::default(), dir.path(), &runner).unwrap_err();
        assert!(err.to_string().contains("Jest was not found"));
        assert!(runner.last_command.borrow().is_none());
    }
}
