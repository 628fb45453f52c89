//! Integration test suite for bazel-deps
//!
//! End-to-end runs of the binary against file-backed Maven repositories laid
//! out in temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cache**: Cache reuse across runs
//! - **errors**: Failure reporting and output atomicity
//! - **repositories**: Repository chain, identifiers and provenance
//! - **resolve**: Closure computation and rendered output

#[path = "../common/mod.rs"]
mod common;

mod cache;
mod errors;
mod repositories;
mod resolve;
