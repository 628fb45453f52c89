//! Multi-root aggregation.

use std::collections::{BTreeMap, BTreeSet};

use super::{ArtifactSource, ClosureResolver, MetadataSource};
use crate::artifact::{ArtifactCoordinate, DependencyClosure, ResolvedArtifact};
use crate::core::{BazelDepsError, Result};

/// Closures of every requested root and their union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Closure per root; a root requested twice keeps its last closure
    pub per_root: BTreeMap<ArtifactCoordinate, DependencyClosure>,
    /// Every resolved artifact of every closure, once
    pub union: BTreeSet<ResolvedArtifact>,
}

/// Resolve each root in order with the same exclusions.
///
/// Any failing root fails the whole call; nothing partial is returned.
pub async fn aggregate<M, A>(
    roots: &[ArtifactCoordinate],
    excluded: &BTreeSet<String>,
    resolver: &ClosureResolver<'_, M, A>,
) -> Result<Aggregate>
where
    M: MetadataSource,
    A: ArtifactSource,
{
    if roots.is_empty() {
        return Err(BazelDepsError::ConfigError {
            message: "at least one artifact is required".to_string(),
        });
    }

    let mut result = Aggregate::default();
    for root in roots {
        let closure = resolver.resolve(root, excluded).await?;
        result.per_root.insert(root.clone(), closure);
    }
    result.union = result.per_root.values().flat_map(|closure| closure.iter().cloned()).collect();

    Ok(result)
}
