//! Common utilities for CLI E2E tests.

use std::process::Command;

use tempfile::TempDir;

/// A CLI invocation context with its own data directory.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Invoke a CLI command and return (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_studyverse"))
            .args(args)
            .env("STUDYVERSE_DATA_DIR", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
        stdout
    }

    /// Invoke a CLI command and expect failure.
    pub fn run_failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {:?}", args);
        stderr
    }
}

/// Parse JSON output from CLI.
pub fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}
