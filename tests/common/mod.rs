//! Common test utilities for bazel-deps integration tests
//!
//! Every test gets its own [`TestProject`]: a temporary directory holding any
//! number of file-backed Maven repositories, a cache and a config file, plus
//! a helper to run the binary against them.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use bazel_deps::test_utils::{TestEnvironment, TestRepository};
use std::path::Path;
use std::process::Command;

/// Config used by default: no retries and a short timeout, so tests that end
/// up asking Maven Central fail fast when offline.
pub const OFFLINE_CONFIG: &str = "[http]\nretries = 0\ntimeout_secs = 2\n";

/// Test project with local repositories and an isolated cache
pub struct TestProject {
    env: TestEnvironment,
}

impl TestProject {
    /// Create a new project with the default config file written
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        env.write_config(OFFLINE_CONFIG)?;
        Ok(Self {
            env,
        })
    }

    /// Create a file repository named `name`
    pub fn repository(&self, name: &str) -> Result<TestRepository> {
        self.env.repository(name)
    }

    /// Replace the config file; the offline HTTP settings are kept
    pub fn write_config(&self, content: &str) -> Result<()> {
        self.env.write_config(&format!("{content}\n{OFFLINE_CONFIG}"))
    }

    /// Cache directory passed with `--cache-dir`
    pub fn cache_path(&self) -> &Path {
        &self.env.cache_dir
    }

    /// Files currently in the cache
    pub fn cached_files(&self) -> Vec<String> {
        self.env.cached_files()
    }

    /// Run bazel-deps with the project's config and cache
    pub fn run_bazel_deps(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_bazel-deps");
        let output = Command::new(binary)
            .arg("--config")
            .arg(&self.env.config_path)
            .arg("--cache-dir")
            .arg(&self.env.cache_dir)
            .args(args)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run bazel-deps")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(self.success, "Command failed with code {:?}\nStderr: {}", self.code, self.stderr);
        self
    }

    /// Assert the command failed with exit status 1 and printed nothing on stdout
    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        assert_eq!(self.code, Some(1));
        assert!(self.stdout.is_empty(), "Failed run wrote to stdout: {}", self.stdout);
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stdout does not contain the given text
    pub fn assert_stdout_not_contains(&self, text: &str) -> &Self {
        assert!(
            !self.stdout.contains(text),
            "Expected stdout not to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }

    /// `maven_jar` lines of the output, in order
    pub fn jar_lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|line| line.starts_with("maven_jar(")).collect()
    }

    /// `maven_server` lines of the output, in order
    pub fn server_lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|line| line.starts_with("maven_server(")).collect()
    }
}
