//! Command-line interface for bazel-deps.
//!
//! bazel-deps is a single command: it takes one or more root artifacts,
//! resolves their transitive closures against a repository chain and prints
//! the `WORKSPACE` and `BUILD` lines that make them available to Bazel.
//!
//! ```bash
//! # Resolve one artifact against Maven Central
//! bazel-deps com.fasterxml.jackson.core:jackson-databind:2.5.0
//!
//! # Several roots, a private repository tried first, one artifact left out
//! bazel-deps -r corp@https://nexus.example.com/repository/maven/ \
//!     -x commons-logging:commons-logging:1.2 \
//!     org.apache.httpcomponents:httpclient:4.5.2 com.google.guava:guava:18.0
//! ```
//!
//! # Output
//!
//! Everything is resolved and rendered before the first byte reaches stdout:
//! a failing run prints nothing there, only the error on stderr. Progress
//! messages go to stderr through `tracing`.
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only report errors
//! - `--config <file>` - Use a specific global configuration file
//! - `--cache-dir <dir>` - Use a specific cache directory

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::artifact::{ArtifactCoordinate, canonical_exclusions};
use crate::cache::LocalCache;
use crate::config::GlobalConfig;
use crate::constants::{BUILD_BANNER, WORKSPACE_BANNER};
use crate::core::BazelDepsError;
use crate::emit::Emitter;
use crate::maven::MavenSession;
use crate::repository::{RepositoryEntry, RepositoryRegistry};
use crate::resolver::{ClosureResolver, aggregate};
use crate::transport::RepositoryTransport;

/// Runtime settings derived from the command line.
///
/// Kept apart from [`Cli`] so tests can check flag handling without
/// installing a global subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` defers to `RUST_LOG` (or `info`).
    pub log_level: Option<String>,
    /// Explicit global configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the stderr subscriber. Safe to call more than once.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Resolve Maven artifacts and print Bazel declarations for them.
#[derive(Parser, Debug)]
#[command(
    name = "bazel-deps",
    about = "Generate Bazel WORKSPACE and BUILD declarations for Maven artifacts",
    version,
    long_about = "Resolves the transitive dependencies of each ARTIFACT against a chain of Maven \
                  repositories and prints maven_server/maven_jar and java_library declarations."
)]
pub struct Cli {
    /// Root artifacts, as group:artifact[:extension[:classifier]]:version.
    #[arg(value_name = "ARTIFACT")]
    artifacts: Vec<String>,

    /// Leave an artifact (and whatever only it pulls in) out of every closure.
    ///
    /// May be repeated. Uses the same coordinate form as ARTIFACT.
    #[arg(short = 'x', long = "exclude", value_name = "ARTIFACT")]
    exclude: Vec<String>,

    /// Add a repository, as `<location>` or `<id>@<location>`.
    ///
    /// May be repeated. Repositories are tried in the order given, before
    /// configured ones and Maven Central. Bare locations are named `uri<n>`.
    #[arg(short = 'r', long = "repository", value_name = "[ID@]LOCATION")]
    repositories: Vec<String>,

    /// Directory for downloaded POMs and artifacts.
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Path to the global configuration file (default: ~/.bazel-deps/config.toml).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to `RUST_LOG=debug`.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Execute the command: resolve, render, then print to stdout.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();

        let output = self.run(&config).await?;
        print!("{output}");
        Ok(())
    }

    /// Build a [`CliConfig`] from the parsed arguments.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Resolve every root and render the complete stdout text.
    ///
    /// Nothing is written anywhere but the cache; a failure at any stage
    /// returns the error and no text.
    pub async fn run(&self, config: &CliConfig) -> Result<String> {
        if self.artifacts.is_empty() {
            return Err(BazelDepsError::ConfigError {
                message: "at least one artifact is required".to_string(),
            }
            .into());
        }

        let global = GlobalConfig::load_with_optional(config.config_path.clone()).await?;

        let mut entries = self
            .repositories
            .iter()
            .map(|text| text.parse::<RepositoryEntry>())
            .collect::<Result<Vec<_>, _>>()?;
        entries.extend(global.repository_entries()?);
        let registry = RepositoryRegistry::build(&entries)?;
        debug!("Repositories: {}", registry.ids().join(", "));

        let excluded = canonical_exclusions(self.exclude.iter().chain(global.exclude.iter()))?;
        let roots = self
            .artifacts
            .iter()
            .map(|text| text.parse::<ArtifactCoordinate>())
            .collect::<Result<Vec<_>, _>>()?;

        let cache_dir = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => global.expanded_cache_dir()?.unwrap_or_else(LocalCache::default_dir),
        };
        let cache = LocalCache::new(cache_dir);
        cache.ensure_cache_dir().await?;
        debug!("Using cache directory {}", cache.cache_dir().display());

        let transport = RepositoryTransport::new(global.http.options())?;
        let session = MavenSession::new(&registry, &transport, &cache);
        let resolver = ClosureResolver::new(&registry, &session, &session);
        let result = aggregate(&roots, &excluded, &resolver).await?;

        let emitter = Emitter::new()?;
        let manifest = emitter.emit_manifest(&registry, &result.union)?;
        let build = emitter.emit_build_declarations(&result.per_root)?;

        Ok(format!("{WORKSPACE_BANNER}{manifest}{BUILD_BANNER}{build}"))
    }
}
