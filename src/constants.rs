//! Global constants used throughout the bazel-deps codebase.
//!
//! Default repository, network timeouts, retry parameters and file names that
//! are shared by more than one module live here so the numbers are easy to find.

use std::time::Duration;

/// Identifier of the default public Maven repository.
pub const DEFAULT_REPOSITORY_ID: &str = "central";

/// Location of the default public Maven repository.
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2/";

/// Prefix for identifiers assigned to repositories given as a bare location.
///
/// The n-th configured entry becomes `uri<n>`.
pub const POSITIONAL_REPOSITORY_PREFIX: &str = "uri";

/// Default HTTP request timeout (30 seconds).
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries for transient HTTP failures.
pub const DEFAULT_HTTP_RETRIES: usize = 3;

/// Starting delay for exponential backoff between HTTP retries (100ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 100;

/// Maximum backoff delay between HTTP retries (2 seconds).
pub const MAX_BACKOFF_DELAY_MS: u64 = 2_000;

/// Default User-Agent header sent to repositories.
pub const DEFAULT_USER_AGENT: &str = concat!("bazel-deps/", env!("CARGO_PKG_VERSION"));

/// Cache directory name below the platform cache directory.
pub const CACHE_DIR_NAME: &str = "bazel-deps";

/// Cache directory used when the platform has no cache directory.
pub const FALLBACK_CACHE_DIR: &str = "/tmp/bazel-deps-repo";

/// File name of Maven version listings.
pub const MAVEN_METADATA_FILE: &str = "maven-metadata.xml";

/// Maximum depth of `<parent>` chains and BOM imports.
///
/// Real-world hierarchies rarely exceed ten levels; anything deeper is treated
/// as a cycle.
pub const MAX_PARENT_DEPTH: usize = 32;

/// Maximum number of passes when interpolating `${...}` expressions.
pub const MAX_INTERPOLATION_PASSES: usize = 8;

/// Banner printed before the `WORKSPACE` block.
pub const WORKSPACE_BANNER: &str = "\n\n--------- Add these lines to your WORKSPACE file ---------\n\n";

/// Banner printed before the `BUILD` block.
pub const BUILD_BANNER: &str = "\n\n--------- Add these lines to your BUILD file ---------\n\n";
