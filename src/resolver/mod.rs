//! Closure resolution.
//!
//! This module turns one root coordinate into its [`DependencyClosure`]: the set
//! of artifacts the root pulls in, each paired with the repository that
//! supplies its bytes.
//!
//! # Architecture Overview
//!
//! Resolution is split along two capability seams so that the traversal rules
//! can be tested without any repository behind them:
//!
//! - [`MetadataSource`] collects the dependency graph of a root. The Maven
//!   implementation ([`crate::maven::MavenSession`]) reads POMs, applies scopes,
//!   POM exclusions and nearest-wins mediation, and returns a
//!   [`DependencyGraph`].
//! - [`ArtifactSource`] answers which repository supplies an artifact's bytes.
//!
//! [`ClosureResolver`] owns the rules in between:
//!
//! 1. **Collection**: ask the metadata source for the root's graph. Failure is
//!    an `UnresolvableDependency` error for the root.
//! 2. **Filtering**: walk the graph in pre-order. A node whose canonical
//!    coordinate string is in the exclusion set is dropped together with
//!    everything only reachable through it; so is every node behind an
//!    optional edge.
//! 3. **Provenance**: each surviving node is located independently, trying
//!    repositories in registry order. No supplier means the whole run fails.
//!
//! The root itself is never part of its closure.
//!
//! # Aggregation
//!
//! [`aggregate`] runs the resolver for several roots one after the other and
//! merges the results into per-root closures plus their union.
//!
//! # Concurrency
//!
//! Everything here is sequential. Roots are resolved in the order given and
//! every repository fallback loop stops at the first success.

mod aggregate;
mod graph;

pub use aggregate::{Aggregate, aggregate};
pub use graph::{DependencyEdge, DependencyGraph, DependencyNode};

use std::collections::BTreeSet;
use std::future::Future;
use tracing::{debug, info};

use crate::artifact::{ArtifactCoordinate, DependencyClosure, ResolvedArtifact};
use crate::core::{BazelDepsError, Result};
use crate::repository::RepositoryRegistry;

/// Capability to collect the dependency graph of a root artifact.
pub trait MetadataSource {
    /// Collect every artifact `root` can reach, after version mediation.
    fn collect(&self, root: &ArtifactCoordinate) -> impl Future<Output = Result<DependencyGraph>>;
}

/// Capability to find the repository that supplies an artifact.
pub trait ArtifactSource {
    /// Identifier of the first repository, in registry order, that has the
    /// artifact's bytes.
    fn locate(&self, coordinate: &ArtifactCoordinate) -> impl Future<Output = Result<String>>;
}

/// Computes dependency closures against one registry.
pub struct ClosureResolver<'a, M, A> {
    registry: &'a RepositoryRegistry,
    metadata: &'a M,
    artifacts: &'a A,
}

impl<'a, M, A> ClosureResolver<'a, M, A>
where
    M: MetadataSource,
    A: ArtifactSource,
{
    /// Create a resolver over `registry` using the given capabilities.
    pub fn new(registry: &'a RepositoryRegistry, metadata: &'a M, artifacts: &'a A) -> Self {
        Self {
            registry,
            metadata,
            artifacts,
        }
    }

    /// Resolve the closure of `root`.
    ///
    /// `excluded` holds canonical coordinate strings
    /// (`group:artifact:extension[:classifier]:version`).
    pub async fn resolve(
        &self,
        root: &ArtifactCoordinate,
        excluded: &BTreeSet<String>,
    ) -> Result<DependencyClosure> {
        info!("Collecting artifacts for {}...", root);

        let graph = self.metadata.collect(root).await.map_err(|e| match e {
            BazelDepsError::UnresolvableDependency { .. } => e,
            other => BazelDepsError::UnresolvableDependency {
                coordinate: root.to_string(),
                repositories: self.registry.ids(),
                reason: other.to_string(),
            },
        })?;
        debug!("Collected {} nodes for {}:\n{}", graph.node_count(), root, graph.to_tree_string());

        let surviving = graph.preorder(|node| {
            if node.optional {
                debug!("Skipping optional {}", node.coordinate);
                return false;
            }
            if excluded.contains(&node.coordinate.to_string()) {
                debug!("Excluding {}", node.coordinate);
                return false;
            }
            true
        });

        let mut closure = DependencyClosure::new();
        for node in surviving {
            let repository = self.artifacts.locate(&node.coordinate).await?;
            // Provenance must name a registered repository
            self.registry.lookup(&repository)?;
            info!("    {} as dependency", node.coordinate);
            closure.insert(ResolvedArtifact::new(node.coordinate, repository));
        }

        Ok(closure)
    }
}
