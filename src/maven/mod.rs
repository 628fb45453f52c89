//! Maven repository semantics.
//!
//! This module knows what a Maven repository contains and how Maven decides
//! which artifacts a project depends on:
//!
//! - [`pom`] and [`metadata`] deserialize `pom.xml` and `maven-metadata.xml`
//!   with `quick-xml`
//! - [`model`] builds effective project models (parent inheritance, `${...}`
//!   interpolation, BOM imports, dependency management)
//! - [`version`] implements Maven version ordering and version ranges
//! - [`MavenSession`] drives all of the above against a repository chain and
//!   is the [`MetadataSource`](crate::resolver::MetadataSource) and
//!   [`ArtifactSource`](crate::resolver::ArtifactSource) the CLI resolves with
//!
//! # Collection rules
//!
//! Starting from the root's effective model, dependencies are collected
//! breadth-first:
//!
//! - `test`, `provided`, `system` and `import` scopes are never followed
//! - optional dependencies are kept only as direct dependencies of the root,
//!   where the resolver filters them
//! - `<exclusions>` declared on a dependency apply to everything below it
//! - the root's `<dependencyManagement>` pins versions and scopes from depth
//!   two on
//! - the first version of an artifact reached wins (nearest-wins); later
//!   occurrences link to the winner
//!
//! POMs of transitive dependencies that cannot be read are logged and treated
//! as having no dependencies; the root's POM is required.

pub mod metadata;
pub mod model;
pub mod pom;
mod session;
pub mod version;

pub use metadata::RepositoryMetadata;
pub use model::{Dependency, Exclusion, ProjectModel};
pub use pom::Pom;
pub use session::MavenSession;
pub use version::{MavenVersion, VersionRequirement};
