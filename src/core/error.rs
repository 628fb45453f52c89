//! Error handling for bazel-deps
//!
//! This module provides the error types and user-facing error reporting for the
//! resolver. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers (and tests) can match on the failure kind
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`BazelDepsError`] - Enumerated error types for every failure of a run
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! # Error Categories
//!
//! - **Configuration**: [`BazelDepsError::ConfigError`], [`BazelDepsError::InvalidCoordinate`],
//!   [`BazelDepsError::RepositoryNotFound`]
//! - **Resolution**: [`BazelDepsError::UnresolvableDependency`], [`BazelDepsError::PomParseError`],
//!   [`BazelDepsError::NetworkError`]
//! - **Emission**: [`BazelDepsError::NameCollision`], [`BazelDepsError::TemplateError`]
//!
//! Every error is fatal to the run. The CLI renders the first error it receives
//! with [`user_friendly_error`] and exits with a non-zero status without printing
//! any partial output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bazel_deps::core::{BazelDepsError, ErrorContext, user_friendly_error};
//!
//! let error = BazelDepsError::ConfigError {
//!     message: "no artifacts given".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for bazel-deps operations.
///
/// Each variant carries enough context (coordinates, repository identifiers,
/// URLs) to explain the failure without consulting the logs.
#[derive(Error, Debug)]
pub enum BazelDepsError {
    /// Configuration error
    ///
    /// Malformed repository entries, duplicate repository identifiers with
    /// conflicting locations, an empty artifact list, or an unreadable config file.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// An artifact coordinate string could not be parsed
    #[error("Invalid artifact coordinate '{input}': {reason}")]
    InvalidCoordinate {
        /// The text that failed to parse
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// A repository identifier is not part of the registry
    #[error("Repository '{id}' is not registered")]
    RepositoryNotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// A dependency could not be collected or supplied by any repository
    ///
    /// Raised when the metadata of a root (or of one of its transitive
    /// dependencies) cannot be collected, or when no configured repository can
    /// supply the artifact of a node that survived filtering.
    #[error("Unable to resolve {coordinate}: {reason}")]
    UnresolvableDependency {
        /// Canonical coordinate of the failing artifact
        coordinate: String,
        /// Identifiers of the repositories that were tried, in order
        repositories: Vec<String>,
        /// What went wrong
        reason: String,
    },

    /// A repository answered with a POM or metadata file that cannot be parsed
    #[error("Invalid metadata for {coordinate} from repository '{repository}': {reason}")]
    PomParseError {
        /// Coordinate whose metadata was being read
        coordinate: String,
        /// Repository that supplied the document
        repository: String,
        /// Parser message
        reason: String,
    },

    /// Transport-level failure talking to a repository
    #[error("Network error for {url}: {reason}")]
    NetworkError {
        /// The (redacted) URL that was requested
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// Two distinct artifacts map to the same generated target name
    #[error("Target name '{name}' is generated by both {first} and {second}")]
    NameCollision {
        /// The colliding generated name
        name: String,
        /// First artifact (sorted order)
        first: String,
        /// Second artifact (sorted order)
        second: String,
    },

    /// Output rendering failed
    #[error("Failed to render output: {reason}")]
    TemplateError {
        /// Template engine message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for BazelDepsError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::InvalidCoordinate {
                input,
                reason,
            } => Self::InvalidCoordinate {
                input: input.clone(),
                reason: reason.clone(),
            },
            Self::RepositoryNotFound {
                id,
            } => Self::RepositoryNotFound {
                id: id.clone(),
            },
            Self::UnresolvableDependency {
                coordinate,
                repositories,
                reason,
            } => Self::UnresolvableDependency {
                coordinate: coordinate.clone(),
                repositories: repositories.clone(),
                reason: reason.clone(),
            },
            Self::PomParseError {
                coordinate,
                repository,
                reason,
            } => Self::PomParseError {
                coordinate: coordinate.clone(),
                repository: repository.clone(),
                reason: reason.clone(),
            },
            Self::NetworkError {
                url,
                reason,
            } => Self::NetworkError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::NameCollision {
                name,
                first,
                second,
            } => Self::NameCollision {
                name: name.clone(),
                first: first.clone(),
                second: second.clone(),
            },
            Self::TemplateError {
                reason,
            } => Self::TemplateError {
                reason: reason.clone(),
            },
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// The CLI never prints raw `Debug` output; every failure goes through an
/// `ErrorContext` so users see what failed, why, and what to try next.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BazelDepsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: BazelDepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Known [`BazelDepsError`] values get a tailored suggestion. IO errors and
/// anything else are wrapped with their full cause chain so context added with
/// `anyhow::Context` is not lost.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(known) = error.downcast_ref::<BazelDepsError>() {
        return create_error_context(known.clone());
    }

    // Errors wrapped in context keep the typed error further down the chain
    for cause in error.chain().skip(1) {
        if let Some(known) = cause.downcast_ref::<BazelDepsError>() {
            return create_error_context(known.clone()).with_details(error.to_string());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BazelDepsError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion(
                    "Check that the cache directory is writable or choose another one with --cache-dir",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BazelDepsError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BazelDepsError::Other {
        message,
    })
}

fn create_error_context(error: BazelDepsError) -> ErrorContext {
    match &error {
        BazelDepsError::ConfigError {
            message,
        } => {
            let suggestion = if message.contains("artifact") {
                "Pass at least one artifact, e.g. 'bazel-deps com.fasterxml.jackson.core:jackson-databind:2.5.0'"
            } else {
                "Repositories are given as '<location>' or '<id>@<location>', and each id may map to only one location"
            };
            ErrorContext::new(error.clone()).with_suggestion(suggestion)
        }

        BazelDepsError::InvalidCoordinate {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Use the form group:artifact[:extension[:classifier]]:version")
            .with_details("Example: com.google.guava:guava:18.0"),

        BazelDepsError::UnresolvableDependency {
            repositories,
            ..
        } => {
            let tried = if repositories.is_empty() {
                "no repositories were tried".to_string()
            } else {
                format!("tried repositories: {}", repositories.join(", "))
            };
            ErrorContext::new(error.clone())
                .with_details(tried)
                .with_suggestion(
                    "Check the coordinate for typos, or add the repository hosting it with -r <id>@<url>",
                )
        }

        BazelDepsError::PomParseError {
            ..
        } => ErrorContext::new(error.clone()).with_suggestion(
            "The repository returned a malformed document. Clear the cache directory and retry, or report it to the repository owner",
        ),

        BazelDepsError::NetworkError {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Check your network connection and the repository URL"),

        BazelDepsError::NameCollision {
            ..
        } => ErrorContext::new(error.clone())
            .with_details("Both artifacts would be registered under the same Bazel repository name")
            .with_suggestion(
                "Exclude one of the versions with -x, or resolve the roots in separate invocations",
            ),

        BazelDepsError::RepositoryNotFound {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Declare the repository with -r <id>@<url> or in the config file"),

        BazelDepsError::TomlError(_) => ErrorContext::new(error.clone())
            .with_suggestion("Check the TOML syntax of your bazel-deps config file"),

        _ => ErrorContext::new(error.clone()),
    }
}
