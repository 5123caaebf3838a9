//! Test runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two operations that touch the outside world:
//! - Test discovery (directory listing)
//! - Test execution (compiler invocation + output capture)
//!
//! The runner in `test_runner.rs` only talks to these traits, so it can be driven with in-memory stubs.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use miette::Diagnostic;
use thiserror::Error;

use crate::config::RunnerConfig;

/// Errors that occur during test operations
#[derive(Debug, Error, Diagnostic)]
pub enum TestError {
    #[error("failed to read examples directory '{}'", .dir.display())]
    #[diagnostic(
        code(forthtest::discovery),
        help("run from the compiler checkout root or pass --examples-dir")
    )]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run '{}': {source}", .program.display())]
    #[diagnostic(code(forthtest::launch))]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write test report")]
    #[diagnostic(code(forthtest::report))]
    Report(#[source] io::Error),
}

// ============================================================================
// Test Discovery Interface
// ============================================================================

/// Find the example files a run should cover.
pub trait TestDiscovery {
    /// List candidate files in `dir`, sorted by file name.
    fn discover_test_files(&self, dir: &Path) -> Result<Vec<PathBuf>, TestError>;
}

// ============================================================================
// Test Executor Interface
// ============================================================================

/// Captured result of one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// stdout followed by stderr, no separator
    pub text: String,
    /// Whether the child exited with status 0
    pub success: bool,
    /// Exit code, if the child was not killed by a signal
    pub code: Option<i32>,
}

impl CapturedOutput {
    /// Merge the two captured streams, stdout first.
    pub fn from_streams(stdout: &[u8], stderr: &[u8], success: bool, code: Option<i32>) -> Self {
        let mut text = String::from_utf8_lossy(stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(stderr));
        Self { text, success, code }
    }
}

/// Run the compiler on one example and capture what it printed.
///
/// Implementations must return `TestError::Launch` for any fault starting or draining the child, rather than
/// panicking, so the runner can report it and move on.
pub trait TestExecutor {
    fn execute_test(&self, file: &Path) -> Result<CapturedOutput, TestError>;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Plain directory listing filtered by entry-name suffix.
#[derive(Debug, Clone)]
pub struct SuffixDiscovery {
    pub suffix: String,
}

impl SuffixDiscovery {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(config.suffix.clone())
    }
}

impl TestDiscovery for SuffixDiscovery {
    fn discover_test_files(&self, dir: &Path) -> Result<Vec<PathBuf>, TestError> {
        use super::test_runner::discover_test_files;
        discover_test_files(dir, &self.suffix)
    }
}

/// Invokes `<compiler> <file> <flags...>` synchronously, without a shell.
#[derive(Debug, Clone)]
pub struct CompilerExecutor {
    pub compiler: PathBuf,
    pub flags: Vec<String>,
}

impl CompilerExecutor {
    pub fn new(compiler: impl Into<PathBuf>, flags: Vec<String>) -> Self {
        Self {
            compiler: compiler.into(),
            flags,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(config.compiler.clone(), config.compiler_flags.clone())
    }
}

impl TestExecutor for CompilerExecutor {
    fn execute_test(&self, file: &Path) -> Result<CapturedOutput, TestError> {
        tracing::debug!(
            program = %self.compiler.display(),
            file = %file.display(),
            flags = ?self.flags,
            "invoking compiler"
        );

        let output = Command::new(&self.compiler)
            .arg(file)
            .args(&self.flags)
            .output()
            .map_err(|source| TestError::Launch {
                program: self.compiler.clone(),
                source,
            })?;

        tracing::trace!(
            status = ?output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "compiler finished"
        );

        Ok(CapturedOutput::from_streams(
            &output.stdout,
            &output.stderr,
            output.status.success(),
            output.status.code(),
        ))
    }
}
