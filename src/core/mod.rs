//! Core types and error handling for bazel-deps.
//!
//! Currently this module hosts the error vocabulary shared by every layer:
//! the registry and parsers raise [`BazelDepsError::ConfigError`] and
//! [`BazelDepsError::InvalidCoordinate`], the resolver raises
//! [`BazelDepsError::UnresolvableDependency`], and the emitter raises
//! [`BazelDepsError::NameCollision`].

pub mod error;

pub use error::{BazelDepsError, ErrorContext, user_friendly_error};

/// Result alias used throughout the library layers.
pub type Result<T, E = BazelDepsError> = std::result::Result<T, E>;
