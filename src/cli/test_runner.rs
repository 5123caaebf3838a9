//! Example suite runner
//!
//! One pass over the example directory: every `.forth` file is handed to the compiler, the merged output is
//! searched for the success marker, and one status line per file is printed as soon as it is known.
//!
//! ## TestReporter Trait
//!
//! Printing goes through the `TestReporter` trait so the loop can be exercised against an in-memory buffer.
//!
//! ## I/O Boundaries
//!
//! Discovery and compiler invocation are abstracted via traits in `test_interfaces.rs`. The defaults list a real
//! directory and spawn a real process.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::test_interfaces::{CapturedOutput, TestDiscovery, TestError, TestExecutor};
use crate::config::{RunnerConfig, SEPARATOR_WIDTH};

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called when a test completes. `output` is the merged compiler output, absent for an ERROR.
    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult, output: Option<&str>) -> io::Result<()>;
}

/// Plain-text reporter: `<name>: <STATUS>` per file, plus the captured output in verbose mode.
pub struct ConsoleReporter<W: Write> {
    out: W,
    pub verbose: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult, output: Option<&str>) -> io::Result<()> {
        writeln!(self.out, "{}: {}", test.name, result)?;

        if self.verbose {
            if let Some(text) = output {
                writeln!(self.out, "{}", text)?;
                writeln!(self.out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
            }
        }

        // Lines must show up while the next compiler invocation is still running
        self.out.flush()
    }
}

/// Tally of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl TestSummary {
    fn record(&mut self, result: &TestResult) {
        self.total += 1;
        match result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail => self.failed += 1,
            TestResult::Error(_) => self.errored += 1,
        }
    }
}

/// A discovered example file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    pub file_path: PathBuf,
    /// Final path segment, used in the report line
    pub name: String,
}

impl TestInfo {
    pub fn new(file_path: PathBuf) -> Self {
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());
        Self { file_path, name }
    }
}

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    /// Success marker found
    Pass,
    /// Compiler ran but the marker is missing
    Fail,
    /// The compiler could not be run; carries the fault description
    Error(String),
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass => write!(f, "PASS"),
            TestResult::Fail => write!(f, "FAIL"),
            TestResult::Error(msg) => write!(f, "ERROR - {}", msg),
        }
    }
}

/// Run every example in the configured directory, reporting each one as it finishes.
///
/// ## Errors
///
/// Per-example faults never surface here; they become `TestResult::Error`. Only a directory that cannot be listed
/// (`TestError::Discovery`) or a reporter that cannot write (`TestError::Report`) ends the run early.
pub fn run_tests<D, E, R>(
    config: &RunnerConfig,
    discovery: &D,
    executor: &E,
    reporter: &mut R,
) -> Result<TestSummary, TestError>
where
    D: TestDiscovery + ?Sized,
    E: TestExecutor + ?Sized,
    R: TestReporter + ?Sized,
{
    let test_files = discovery.discover_test_files(&config.examples_dir)?;
    tracing::debug!(
        dir = %config.examples_dir.display(),
        count = test_files.len(),
        "collected examples"
    );

    let mut summary = TestSummary::default();

    for file_path in test_files {
        let test = TestInfo::new(file_path);
        let (result, output) = run_single_test(&test, executor, config);

        reporter
            .on_test_complete(&test, &result, output.as_deref())
            .map_err(TestError::Report)?;
        summary.record(&result);
    }

    tracing::info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        "run complete"
    );

    Ok(summary)
}

/// Compile one example and classify it. Returns the merged output alongside the result when the compiler ran.
pub fn run_single_test<E>(test: &TestInfo, executor: &E, config: &RunnerConfig) -> (TestResult, Option<String>)
where
    E: TestExecutor + ?Sized,
{
    match executor.execute_test(&test.file_path) {
        Ok(output) => {
            let result = classify(&output, config);
            (result, Some(output.text))
        }
        Err(e) => {
            tracing::debug!(example = %test.name, error = %e, "compiler invocation failed");
            (TestResult::Error(e.to_string()), None)
        }
    }
}

/// PASS iff the marker occurs in the merged output (and, when configured, the compiler exited with status 0).
pub fn classify(output: &CapturedOutput, config: &RunnerConfig) -> TestResult {
    let marker_found = contains_marker(&output.text, &config.success_marker);
    let exit_ok = !config.require_exit_success || output.success;

    if marker_found && exit_ok {
        TestResult::Pass
    } else {
        if marker_found {
            tracing::debug!(code = ?output.code, "marker found but compiler exited unsuccessfully");
        }
        TestResult::Fail
    }
}

/// Contiguous substring match, case-sensitive.
pub fn contains_marker(text: &str, marker: &str) -> bool {
    text.contains(marker)
}

/// List the entries of `dir` whose name ends with `suffix`, sorted by name.
///
/// Not recursive. Every entry kind is kept, exactly as the listing returns it.
pub fn discover_test_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, TestError> {
    let discovery_error = |source| TestError::Discovery {
        dir: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(discovery_error)? {
        let entry = entry.map_err(discovery_error)?;
        let file_name = entry.file_name();
        // Byte-level match so names that are not valid UTF-8 still count
        if file_name.as_encoded_bytes().ends_with(suffix.as_bytes()) {
            names.push(file_name);
        }
    }

    names.sort_by(|a, b| a.as_encoded_bytes().cmp(b.as_encoded_bytes()));
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}
