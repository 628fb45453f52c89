//! bazel-deps - Maven dependencies for Bazel
//!
//! Resolves the transitive dependency closure of one or more Maven artifacts
//! against an ordered chain of repositories, records which repository supplied
//! each artifact, and renders the declarations a Bazel workspace needs to
//! consume them.
//!
//! # Architecture Overview
//!
//! A run flows through four stages:
//!
//! 1. The [`repository`] registry is built once from the command line and the
//!    global [`config`], with Maven Central appended
//! 2. The [`maven`] session collects each root's dependency graph from POMs,
//!    fetched through a [`transport`] and kept in the [`cache`]
//! 3. The [`resolver`] prunes optional and excluded nodes, locates every
//!    surviving artifact and aggregates the closures of all roots
//! 4. The [`emit`] stage renders `WORKSPACE` and `BUILD` text
//!
//! Any error in any stage fails the whole run before output is produced.
//!
//! # Core Modules
//!
//! - [`artifact`] - Coordinates, resolved artifacts and generated names
//! - [`repository`] - Repository descriptors, the registry and the Maven 2 layout
//! - [`transport`] - HTTP and filesystem access to repositories
//! - [`cache`] - On-disk cache of POMs and artifacts
//! - [`maven`] - POM models, version ordering and dependency collection
//! - [`resolver`] - Closure computation and multi-root aggregation
//! - [`emit`] - Template-based rendering of the Bazel declarations
//! - [`cli`] - Command-line interface
//! - [`config`] - Global configuration file
//! - [`core`] - Error types and user-facing error reporting
//!
//! # Command-Line Usage
//!
//! ```bash
//! bazel-deps com.fasterxml.jackson.core:jackson-databind:2.5.0
//! ```
//!
//! prints
//!
//! ```text
//! --------- Add these lines to your WORKSPACE file ---------
//!
//! maven_server(name="central", url="https://repo1.maven.org/maven2/")
//! maven_jar(name = "com.fasterxml.jackson.core_jackson-annotations", artifact = "com.fasterxml.jackson.core:jackson-annotations:jar:2.5.0", server = "central")
//! maven_jar(name = "com.fasterxml.jackson.core_jackson-core", artifact = "com.fasterxml.jackson.core:jackson-core:jar:2.5.0", server = "central")
//!
//!
//! --------- Add these lines to your BUILD file ---------
//!
//! java_library(
//!   name="jackson-databind",
//!   visibility = ["//visibility:public"],
//!   exports = [
//!     "@com.fasterxml.jackson.core_jackson-annotations//jar",
//!     "@com.fasterxml.jackson.core_jackson-core//jar",
//!   ],
//! )
//! ```

pub mod artifact;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod emit;
pub mod maven;
pub mod repository;
pub mod resolver;
pub mod transport;

// Test utilities (only available in test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
