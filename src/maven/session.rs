//! Maven-backed metadata and artifact sources.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

use super::metadata::RepositoryMetadata;
use super::model::{Exclusion, ProjectModel};
use super::pom::{ParentRef, Pom};
use super::version::VersionRequirement;
use crate::artifact::ArtifactCoordinate;
use crate::cache::LocalCache;
use crate::constants::MAX_PARENT_DEPTH;
use crate::core::{BazelDepsError, Result};
use crate::repository::layout::{artifact_path, pom_path, snapshot_metadata_path, versions_metadata_path};
use crate::repository::{RepositoryDescriptor, RepositoryRegistry};
use crate::resolver::{ArtifactSource, DependencyGraph, MetadataSource};
use crate::transport::Transport;

type LocalFuture<'s, T> = Pin<Box<dyn Future<Output = Result<T>> + 's>>;

/// A queued node of the breadth-first collection.
struct Pending {
    coordinate: ArtifactCoordinate,
    model: Rc<ProjectModel>,
    depth: usize,
    exclusions: Vec<Exclusion>,
}

/// One resolution run against a repository chain.
///
/// Effective models, version listings and artifact locations are memoized for
/// the lifetime of the session, so a POM shared by several roots is read once.
/// The session is single-threaded by construction (`RefCell`, `Rc`).
pub struct MavenSession<'a, T> {
    registry: &'a RepositoryRegistry,
    transport: &'a T,
    cache: &'a LocalCache,
    assembled: RefCell<HashMap<ArtifactCoordinate, Rc<ProjectModel>>>,
    effective: RefCell<HashMap<ArtifactCoordinate, Rc<ProjectModel>>>,
    listings: RefCell<HashMap<String, Rc<Vec<String>>>>,
    locations: RefCell<HashMap<ArtifactCoordinate, String>>,
    /// POMs that every repository answered as absent, without any transfer error.
    missing: RefCell<HashSet<String>>,
}

impl<'a, T: Transport> MavenSession<'a, T> {
    pub fn new(registry: &'a RepositoryRegistry, transport: &'a T, cache: &'a LocalCache) -> Self {
        Self {
            registry,
            transport,
            cache,
            assembled: RefCell::new(HashMap::new()),
            effective: RefCell::new(HashMap::new()),
            listings: RefCell::new(HashMap::new()),
            locations: RefCell::new(HashMap::new()),
            missing: RefCell::new(HashSet::new()),
        }
    }

    /// Name of the file holding `coordinate` in `repository`.
    ///
    /// Differs from the version only for timestamped snapshots.
    async fn file_version(&self, repository: &RepositoryDescriptor, coordinate: &ArtifactCoordinate) -> String {
        if !coordinate.is_snapshot() {
            return coordinate.version.clone();
        }
        let path = snapshot_metadata_path(coordinate);
        match self.transport.get(repository, &path).await {
            Ok(Some(bytes)) => match RepositoryMetadata::parse(&bytes) {
                Ok(metadata) => metadata
                    .snapshot_file_version(
                        &coordinate.version,
                        &coordinate.extension,
                        coordinate.classifier.as_deref(),
                    )
                    .unwrap_or_else(|| coordinate.version.clone()),
                Err(reason) => {
                    warn!("Ignoring unreadable snapshot listing {} in {}: {}", path, repository.id, reason);
                    coordinate.version.clone()
                }
            },
            Ok(None) => coordinate.version.clone(),
            Err(e) => {
                debug!("No snapshot listing for {} in {}: {}", coordinate, repository.id, e);
                coordinate.version.clone()
            }
        }
    }

    /// Read the POM of `coordinate` from the first repository that has it.
    async fn fetch_pom(&self, coordinate: &ArtifactCoordinate) -> Result<Pom> {
        let pom_coordinate = coordinate.pom();
        let mut attempted = Vec::new();
        let mut failures = Vec::new();

        for repository in self.registry.iter() {
            attempted.push(repository.id.clone());
            let file_version = self.file_version(repository, &pom_coordinate).await;
            let path = pom_path(&pom_coordinate, &file_version);

            let bytes = match self.cache.read(repository, &path).await? {
                Some(bytes) => bytes,
                None => match self.transport.get(repository, &path).await {
                    Ok(Some(bytes)) => {
                        self.cache.store(repository, &path, &bytes).await?;
                        bytes
                    }
                    Ok(None) => {
                        debug!("No POM for {} in {}", pom_coordinate, repository.id);
                        continue;
                    }
                    Err(e) => {
                        warn!("Failed to read POM for {} from {}: {}", pom_coordinate, repository.id, e);
                        failures.push(format!("{}: {}", repository.id, e));
                        continue;
                    }
                },
            };

            debug!("Read POM for {} from {}", pom_coordinate, repository.id);
            return Pom::parse(&bytes).map_err(|reason| BazelDepsError::PomParseError {
                coordinate: pom_coordinate.to_string(),
                repository: repository.id.clone(),
                reason,
            });
        }

        if failures.is_empty() {
            self.missing.borrow_mut().insert(pom_coordinate.to_string());
        }
        Err(BazelDepsError::UnresolvableDependency {
            coordinate: pom_coordinate.to_string(),
            repositories: attempted,
            reason: unavailable_reason("no repository has its POM", &failures),
        })
    }

    /// Versions of `group:artifact` listed by any repository, in first-seen order.
    async fn available_versions(&self, group_id: &str, artifact_id: &str) -> Rc<Vec<String>> {
        let key = format!("{group_id}:{artifact_id}");
        let cached = self.listings.borrow().get(&key).cloned();
        if let Some(versions) = cached {
            return versions;
        }

        let path = versions_metadata_path(group_id, artifact_id);
        let mut versions: Vec<String> = Vec::new();
        for repository in self.registry.iter() {
            match self.transport.get(repository, &path).await {
                Ok(Some(bytes)) => match RepositoryMetadata::parse(&bytes) {
                    Ok(metadata) => {
                        for version in metadata.versions() {
                            if !versions.contains(&version) {
                                versions.push(version);
                            }
                        }
                    }
                    Err(reason) => {
                        warn!("Ignoring unreadable version listing of {} in {}: {}", key, repository.id, reason);
                    }
                },
                Ok(None) => debug!("No version listing of {} in {}", key, repository.id),
                Err(e) => warn!("Failed to read version listing of {} from {}: {}", key, repository.id, e),
            }
        }

        let versions = Rc::new(versions);
        self.listings.borrow_mut().insert(key, Rc::clone(&versions));
        versions
    }

    /// Turn declared version text into one concrete version.
    async fn resolve_version(&self, group_id: &str, artifact_id: &str, text: &str) -> Result<String> {
        let unresolvable = |reason: String| BazelDepsError::UnresolvableDependency {
            coordinate: format!("{group_id}:{artifact_id}:{text}"),
            repositories: self.registry.ids(),
            reason,
        };

        let requirement = VersionRequirement::parse(text).map_err(&unresolvable)?;
        if !requirement.needs_listing() {
            return Ok(text.trim().to_string());
        }

        let versions = self.available_versions(group_id, artifact_id).await;
        let selected = requirement
            .select(versions.iter().map(String::as_str))
            .ok_or_else(|| unresolvable(format!("no published version matches '{text}'")))?;
        debug!("Selected {}:{}:{} for '{}'", group_id, artifact_id, selected, text);
        Ok(selected)
    }

    async fn parent_coordinate(&self, parent: &ParentRef) -> Result<ArtifactCoordinate> {
        let group_id = parent.group_id.trim();
        let artifact_id = parent.artifact_id.trim();
        let version = self.resolve_version(group_id, artifact_id, &parent.version).await?;
        Ok(ArtifactCoordinate::new(group_id, artifact_id, version).with_extension("pom"))
    }

    /// POM with its parent chain folded in, not yet interpolated.
    fn assemble(&self, coordinate: ArtifactCoordinate, depth: usize) -> LocalFuture<'_, Rc<ProjectModel>> {
        Box::pin(async move {
            let key = coordinate.pom();
            let cached = self.assembled.borrow().get(&key).cloned();
            if let Some(model) = cached {
                return Ok(model);
            }
            if depth > MAX_PARENT_DEPTH {
                return Err(BazelDepsError::UnresolvableDependency {
                    coordinate: key.to_string(),
                    repositories: self.registry.ids(),
                    reason: format!("parent or import chain is deeper than {MAX_PARENT_DEPTH} levels"),
                });
            }

            let pom = self.fetch_pom(&key).await?;
            let mut model = ProjectModel::from_pom(&pom);
            if let Some(parent) = model.parent.clone() {
                let parent_coordinate = self.parent_coordinate(&parent).await?;
                let parent_model = self.assemble(parent_coordinate, depth + 1).await?;
                model.inherit(&parent_model);
            }

            let model = Rc::new(model);
            self.assembled.borrow_mut().insert(key, Rc::clone(&model));
            Ok(model)
        })
    }

    /// Whether `error` only says a descriptor is absent everywhere or unparsable.
    ///
    /// Transfer failures are not in this class: the POM may exist in the
    /// repository that could not be reached.
    fn is_missing_or_invalid(&self, error: &BazelDepsError) -> bool {
        match error {
            BazelDepsError::PomParseError { .. } => true,
            BazelDepsError::UnresolvableDependency { coordinate, .. } => self.missing.borrow().contains(coordinate),
            _ => false,
        }
    }

    /// Fully built model: inherited, interpolated, imports merged, management applied.
    pub fn effective_model(&self, coordinate: ArtifactCoordinate, depth: usize) -> LocalFuture<'_, Rc<ProjectModel>> {
        Box::pin(async move {
            let key = coordinate.pom();
            let cached = self.effective.borrow().get(&key).cloned();
            if let Some(model) = cached {
                return Ok(model);
            }

            let assembled = self.assemble(key.clone(), depth).await?;
            let mut model = (*assembled).clone();
            model.interpolate();

            let mut imported = Vec::new();
            for import in model.imports() {
                let Some(version_text) = import.version.as_deref() else {
                    warn!("Ignoring BOM import {} without a version in {}", import.management_key(), key);
                    continue;
                };
                let version = self.resolve_version(&import.group_id, &import.artifact_id, version_text).await?;
                let bom = self.effective_model(import.coordinate(&version), depth + 1).await?;
                imported.push(bom);
            }
            model.import_management(imported.iter().map(Rc::as_ref));
            model.apply_management();

            let model = Rc::new(model);
            self.effective.borrow_mut().insert(key, Rc::clone(&model));
            Ok(model)
        })
    }
}

impl<T: Transport> MetadataSource for MavenSession<'_, T> {
    /// Breadth-first collection with nearest-wins mediation.
    async fn collect(&self, root: &ArtifactCoordinate) -> Result<DependencyGraph> {
        let root_model = self.effective_model(root.clone(), 0).await.map_err(|e| match e {
            BazelDepsError::UnresolvableDependency {
                repositories,
                reason,
                ..
            } => BazelDepsError::UnresolvableDependency {
                coordinate: root.to_string(),
                repositories,
                reason,
            },
            other => other,
        })?;

        let mut graph = DependencyGraph::new(root.clone());
        let mut winners: HashMap<String, ArtifactCoordinate> = HashMap::new();
        winners.insert(root.versionless_key(), root.clone());

        let mut queue = VecDeque::new();
        queue.push_back(Pending {
            coordinate: root.clone(),
            model: Rc::clone(&root_model),
            depth: 0,
            exclusions: Vec::new(),
        });

        while let Some(current) = queue.pop_front() {
            for declared in &current.model.dependencies {
                let mut dependency = declared.clone();
                if current.depth >= 1
                    && let Some(managed) = root_model.managed(&dependency)
                {
                    dependency.override_from(managed);
                }

                if !dependency.is_collected_scope() {
                    continue;
                }
                if dependency.optional && current.depth >= 1 {
                    continue;
                }
                if current.exclusions.iter().any(|e| e.matches(&dependency.group_id, &dependency.artifact_id)) {
                    debug!(
                        "{}:{} excluded below {}",
                        dependency.group_id, dependency.artifact_id, current.coordinate
                    );
                    continue;
                }

                let Some(version_text) = dependency.version.as_deref() else {
                    return Err(BazelDepsError::UnresolvableDependency {
                        coordinate: format!("{}:{}", dependency.group_id, dependency.artifact_id),
                        repositories: self.registry.ids(),
                        reason: format!("no version declared or managed (required by {})", current.coordinate),
                    });
                };
                let version = self.resolve_version(&dependency.group_id, &dependency.artifact_id, version_text).await?;
                let coordinate = dependency.coordinate(&version);

                let key = coordinate.versionless_key();
                if let Some(winner) = winners.get(&key) {
                    if *winner != coordinate {
                        debug!("{} omitted for conflict with {}", coordinate, winner);
                    }
                    graph.add_dependency(&current.coordinate, winner.clone(), dependency.optional);
                    continue;
                }
                winners.insert(key, coordinate.clone());
                graph.add_dependency(&current.coordinate, coordinate.clone(), dependency.optional);

                let model = match self.effective_model(coordinate.clone(), 0).await {
                    Ok(model) => model,
                    Err(e) if self.is_missing_or_invalid(&e) => {
                        warn!("The POM for {} is unavailable, no dependency information available: {}", coordinate, e);
                        Rc::new(ProjectModel::default())
                    }
                    Err(e) => return Err(e),
                };
                let mut exclusions = current.exclusions.clone();
                exclusions.extend(dependency.exclusions.iter().cloned());
                queue.push_back(Pending {
                    coordinate,
                    model,
                    depth: current.depth + 1,
                    exclusions,
                });
            }
        }

        Ok(graph)
    }
}

impl<T: Transport> ArtifactSource for MavenSession<'_, T> {
    /// Download into the cache from the first repository that has the file.
    async fn locate(&self, coordinate: &ArtifactCoordinate) -> Result<String> {
        let known = self.locations.borrow().get(coordinate).cloned();
        if let Some(id) = known {
            return Ok(id);
        }

        let mut attempted = Vec::new();
        let mut failures = Vec::new();
        for repository in self.registry.iter() {
            attempted.push(repository.id.clone());
            let file_version = self.file_version(repository, coordinate).await;
            let path = artifact_path(coordinate, &file_version);

            let found = if self.cache.contains(repository, &path).await {
                true
            } else {
                let destination = self.cache.path_for(repository, &path);
                match self.transport.download(repository, &path, &destination).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!("Failed to download {} from {}: {}", coordinate, repository.id, e);
                        failures.push(format!("{}: {}", repository.id, e));
                        false
                    }
                }
            };

            if found {
                debug!("{} supplied by {}", coordinate, repository.id);
                self.locations.borrow_mut().insert(coordinate.clone(), repository.id.clone());
                return Ok(repository.id.clone());
            }
        }

        Err(BazelDepsError::UnresolvableDependency {
            coordinate: coordinate.to_string(),
            repositories: attempted,
            reason: unavailable_reason("no repository supplies the artifact", &failures),
        })
    }
}

fn unavailable_reason(summary: &str, failures: &[String]) -> String {
    if failures.is_empty() {
        summary.to_string()
    } else {
        format!("{summary} ({})", failures.join("; "))
    }
}
