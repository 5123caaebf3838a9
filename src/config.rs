//! Runner configuration
//!
//! Defaults reproduce the fixed layout of the Forth compiler checkout: examples live in `examples/`, the compiler is
//! built to `./build/forth_compiler`, and a run counts as successful when the compiler announces it is ready for the
//! next phase.

use std::path::PathBuf;

/// Directory scanned for example programs.
pub const EXAMPLES_DIR: &str = "examples/";

/// Suffix an entry name must end with to be treated as an example.
pub const EXAMPLE_SUFFIX: &str = ".forth";

/// Compiler binary invoked once per example.
pub const COMPILER_PATH: &str = "./build/forth_compiler";

/// Flags appended after the example path.
pub const COMPILER_FLAGS: [&str; 3] = ["-v", "--show-code", "--stats"];

/// Literal the compiler prints when it considers a run successful.
pub const SUCCESS_MARKER: &str = "Ready for Phase 5: ESP32 Integration & Optimization";

/// Width of the `=` rule printed after each verbose block.
pub const SEPARATOR_WIDTH: usize = 40;

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Directory holding the example programs
    pub examples_dir: PathBuf,
    /// Entry-name suffix selecting examples
    pub suffix: String,
    /// Compiler under test
    pub compiler: PathBuf,
    /// Arguments placed after the example path
    pub compiler_flags: Vec<String>,
    /// Text that must appear in the merged output for a PASS
    pub success_marker: String,
    /// Echo the merged output of every run
    pub verbose: bool,
    /// Also require a zero exit status for a PASS
    pub require_exit_success: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            examples_dir: PathBuf::from(EXAMPLES_DIR),
            suffix: EXAMPLE_SUFFIX.to_string(),
            compiler: PathBuf::from(COMPILER_PATH),
            compiler_flags: COMPILER_FLAGS.iter().map(|f| f.to_string()).collect(),
            success_marker: SUCCESS_MARKER.to_string(),
            verbose: false,
            require_exit_success: false,
        }
    }
}

impl RunnerConfig {
    /// Set the directory to scan
    pub fn with_examples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.examples_dir = dir.into();
        self
    }

    /// Set the compiler binary
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Set the success marker
    pub fn with_success_marker(mut self, marker: impl Into<String>) -> Self {
        self.success_marker = marker.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_require_exit_success(mut self, require: bool) -> Self {
        self.require_exit_success = require;
        self
    }
}
