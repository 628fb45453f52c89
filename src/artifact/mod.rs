//! Artifact identities: coordinates, resolved artifacts and exclusion sets.

mod coordinate;

pub use coordinate::{ArtifactCoordinate, DEFAULT_EXTENSION, type_to_extension};

use std::collections::BTreeSet;
use std::fmt;

use crate::core::BazelDepsError;

/// An artifact paired with the repository that actually supplied it.
///
/// Two resolved artifacts are equal only when both the coordinate and the
/// repository identifier match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedArtifact {
    /// The resolved coordinate
    pub coordinate: ArtifactCoordinate,
    /// Identifier of the supplying repository
    pub repository: String,
}

impl ResolvedArtifact {
    /// Pair a coordinate with its supplying repository.
    pub fn new(coordinate: ArtifactCoordinate, repository: impl Into<String>) -> Self {
        Self {
            coordinate,
            repository: repository.into(),
        }
    }

    /// Bazel repository name generated for this artifact (`group_artifact`).
    pub fn target_name(&self) -> String {
        target_name(&self.coordinate)
    }
}

impl fmt::Display for ResolvedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.coordinate, self.repository)
    }
}

/// The transitive closure of one root: every artifact it pulls in, root excluded.
pub type DependencyClosure = BTreeSet<ResolvedArtifact>;

/// Generated Bazel name for an artifact: `group + "_" + artifact`.
pub fn target_name(coordinate: &ArtifactCoordinate) -> String {
    format!("{}_{}", coordinate.group_id, coordinate.artifact_id)
}

/// Canonicalize user-supplied exclusion strings.
///
/// Each string is parsed as a coordinate and re-rendered, so `g:a:1.0` and
/// `g:a:jar:1.0` exclude the same node.
pub fn canonical_exclusions<I, S>(exclusions: I) -> Result<BTreeSet<String>, BazelDepsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exclusions
        .into_iter()
        .map(|s| s.as_ref().parse::<ArtifactCoordinate>().map(|c| c.to_string()))
        .collect()
}
