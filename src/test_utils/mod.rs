//! Test utilities for bazel-deps
//!
//! This module provides utilities for writing tests, including helpers for
//! building POM documents, serving repositories from memory, and laying out
//! repositories on disk.
//!
//! # Test Isolation
//!
//! The utilities in this module help ensure tests don't interfere with each other:
//! - Every [`TestEnvironment`] owns its temporary directory and cache
//! - [`MemoryTransport`] keeps its files per instance and records requests
//!
//! # Example
//!
//! ```rust,no_run
//! use bazel_deps::test_utils::{DependencySpec, PomBuilder, TestEnvironment};
//!
//! let env = TestEnvironment::new().unwrap();
//! let repo = env.repository("local").unwrap();
//! repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:1.0")))
//!     .unwrap();
//! repo.publish(&PomBuilder::new("org.example:lib:1.0")).unwrap();
//! ```

pub mod environment;
pub mod fixtures;
pub mod transport;

pub use environment::{TestEnvironment, TestRepository};
pub use fixtures::{DependencySpec, PomBuilder, metadata_xml};
pub use transport::MemoryTransport;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// This function initializes the tracing subscriber for tests, but only once
/// regardless of how many times it's called. It respects the `RUST_LOG` environment
/// variable if set, or uses the provided log level.
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // No logging if neither is provided
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}
