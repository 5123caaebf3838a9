//! CLI module for the example suite runner
//!
//! ## Usage
//!
//! - `forthtest` - run every example, one status line each
//! - `forthtest -v` / `forthtest --verbose` - also print the compiler output of every example
//!
//! ## Modules
//!
//! - `test_interfaces` - discovery/execution traits and the process-backed defaults
//! - `test_runner` - classification, reporting and the run loop
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros, but a command line clap rejects never fails the run:
//! it falls back to the defaults, with verbosity decided by the first argument alone.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod test_interfaces;
pub mod test_runner;

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;

use crate::config::RunnerConfig;
use crate::version::FORTHTEST_VERSION;
use test_interfaces::{CompilerExecutor, SuffixDiscovery};
use test_runner::ConsoleReporter;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Compile every Forth example and check the compiler reports success
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "forthtest")]
#[command(version = FORTHTEST_VERSION)]
#[command(about = "Compile every Forth example and check the compiler reports success", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Print help (long form only; a bare `-h` is an ordinary argument)
    #[arg(long, action = clap::ArgAction::Help)]
    pub help: Option<bool>,

    /// Print version (long form only; a bare `-V` is an ordinary argument)
    #[arg(long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Print the full compiler output after each status line
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory holding the examples (default: examples/)
    #[arg(long, value_name = "DIR")]
    pub examples_dir: Option<PathBuf>,

    /// Compiler binary to invoke (default: ./build/forth_compiler)
    #[arg(long, value_name = "PATH")]
    pub compiler: Option<PathBuf>,

    /// Text whose presence marks a successful compile
    #[arg(long, value_name = "TEXT")]
    pub marker: Option<String>,

    /// Also require the compiler to exit with status 0
    #[arg(long)]
    pub require_exit_success: bool,

    /// Anything else on the command line is accepted and ignored
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

impl Cli {
    /// Parse a full argument list (program name first).
    ///
    /// Only `--help` and `--version` come back as errors; any other rejection falls back to
    /// [`Cli::from_first_arg`].
    pub fn parse_lenient<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        match Cli::try_parse_from(args.iter()) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Err(e),
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "unrecognised command line, using defaults");
                Ok(Cli::from_first_arg(&args))
            }
        }
    }

    /// Defaults, with verbose mode on iff the first argument is `-v` or `--verbose`.
    pub fn from_first_arg(args: &[OsString]) -> Self {
        let verbose = matches!(args.get(1).and_then(|a| a.to_str()), Some("-v" | "--verbose"));
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// Build the runner configuration, keeping defaults for anything not given.
    pub fn to_config(&self) -> RunnerConfig {
        let mut config = RunnerConfig::default()
            .with_verbose(self.verbose)
            .with_require_exit_success(self.require_exit_success);

        if let Some(dir) = &self.examples_dir {
            config = config.with_examples_dir(dir.clone());
        }
        if let Some(compiler) = &self.compiler {
            config = config.with_compiler(compiler.clone());
        }
        if let Some(marker) = &self.marker {
            config = config.with_success_marker(marker.clone());
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. Individual FAIL or ERROR results never change the exit
/// code; only a run that cannot start does.
pub fn run() {
    let cli = match Cli::parse_lenient(env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if !cli.ignored.is_empty() {
        tracing::debug!(ignored = ?cli.ignored, "ignoring extra arguments");
    }

    match execute(&cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute one run and return the exit code.
pub fn execute(cli: &Cli) -> CliResult<ExitCode> {
    let config = cli.to_config();
    let discovery = SuffixDiscovery::from_config(&config);
    let executor = CompilerExecutor::from_config(&config);
    let mut reporter = ConsoleReporter::new(io::stdout().lock(), config.verbose);

    match test_runner::run_tests(&config, &discovery, &executor, &mut reporter) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => Err(CliError::failure(format!("{:?}", miette::Report::new(e)))),
    }
}

// ============================================================================
// Tests
// ============================================================================
