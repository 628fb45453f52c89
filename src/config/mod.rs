//! Configuration management for bazel-deps.
//!
//! Settings come from two places, merged by the CLI:
//!
//! 1. **Global Configuration** (`~/.bazel-deps/config.toml`, see [`GlobalConfig`])
//! 2. **Command line** flags
//!
//! # Precedence
//!
//! - Repositories given with `-r` are tried before configured ones
//! - Exclusions from both sources are unioned
//! - `--cache-dir` overrides `cache_dir`, which overrides the platform default
//!
//! Maven Central is always appended to the repository chain (see
//! [`RepositoryRegistry`](crate::repository::RepositoryRegistry)).

mod global;

pub use global::{GlobalConfig, HttpConfig};
