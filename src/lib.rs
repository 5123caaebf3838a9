#![forbid(unsafe_code)]
//! Batch runner for the Forth compiler example suite
//!
//! Lists the `.forth` programs in `examples/`, compiles each one with `./build/forth_compiler -v --show-code --stats`,
//! and prints `PASS` when the compiler's output contains its success marker, `FAIL` when it does not, and `ERROR`
//! when the compiler could not be started at all.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod version;

pub use cli::test_interfaces::{CapturedOutput, CompilerExecutor, SuffixDiscovery, TestDiscovery, TestError, TestExecutor};
pub use cli::test_runner::{ConsoleReporter, TestInfo, TestReporter, TestResult, TestSummary, run_tests};
pub use config::RunnerConfig;
