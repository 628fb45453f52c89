//! Bazel text emission.
//!
//! Two blocks are produced from a finished resolution:
//!
//! - the **manifest** (`WORKSPACE` lines): one `maven_server` per repository in
//!   registry order, then one `maven_jar` per artifact of the union
//! - the **build declarations** (`BUILD` lines): one `java_library` per root
//!   exporting every artifact of its closure
//!
//! Output is byte-for-byte deterministic. Every list is sorted explicitly
//! before it reaches a template, so map iteration order never leaks into the
//! text. Templates are rendered with `tera` with autoescaping disabled, since
//! the output is Starlark, not HTML.
//!
//! Generated repository names are `group_artifact`. Two distinct artifacts
//! mapping to the same name would overwrite each other in Bazel, so that is a
//! [`BazelDepsError::NameCollision`] raised before any text is produced.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use crate::artifact::{ArtifactCoordinate, DependencyClosure, ResolvedArtifact};
use crate::core::{BazelDepsError, Result};
use crate::repository::RepositoryRegistry;

const MANIFEST_TEMPLATE: &str = "manifest";
const BUILD_TEMPLATE: &str = "build";

const MANIFEST_SOURCE: &str = r#"{% for server in servers -%}
maven_server(name="{{ server.name }}", url="{{ server.url }}")
{% endfor -%}
{% for jar in jars -%}
maven_jar(name = "{{ jar.name }}", artifact = "{{ jar.artifact }}", server = "{{ jar.server }}")
{% endfor -%}
"#;

const BUILD_SOURCE: &str = r#"{% for library in libraries -%}
java_library(
  name="{{ library.name }}",
  visibility = ["//visibility:public"],
  exports = [
{% for export in library.exports %}    "{{ export }}",
{% endfor %}  ],
)

{% endfor -%}
"#;

#[derive(Debug, Serialize)]
struct ServerLine {
    name: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct JarLine {
    name: String,
    artifact: String,
    server: String,
}

#[derive(Debug, Serialize)]
struct LibraryBlock {
    name: String,
    exports: Vec<String>,
}

/// Renders manifests and build declarations.
pub struct Emitter {
    tera: Tera,
}

impl Emitter {
    /// Compile the templates.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_templates(vec![(MANIFEST_TEMPLATE, MANIFEST_SOURCE), (BUILD_TEMPLATE, BUILD_SOURCE)])
            .map_err(template_error)?;
        Ok(Self {
            tera,
        })
    }

    /// Render the repository-registration manifest.
    ///
    /// Repositories keep registry order. Artifacts are sorted by artifact
    /// name, then canonical coordinate, then repository identifier.
    pub fn emit_manifest(
        &self,
        registry: &RepositoryRegistry,
        union: &BTreeSet<ResolvedArtifact>,
    ) -> Result<String> {
        check_name_collisions(union)?;

        let servers: Vec<ServerLine> = registry
            .iter()
            .map(|repository| ServerLine {
                name: repository.id.clone(),
                url: repository.redacted_url(),
            })
            .collect();

        let mut artifacts: Vec<&ResolvedArtifact> = union.iter().collect();
        artifacts.sort_by(|a, b| {
            a.coordinate
                .artifact_id
                .cmp(&b.coordinate.artifact_id)
                .then_with(|| a.coordinate.to_string().cmp(&b.coordinate.to_string()))
                .then_with(|| a.repository.cmp(&b.repository))
        });
        let jars: Vec<JarLine> = artifacts
            .into_iter()
            .map(|artifact| JarLine {
                name: artifact.target_name(),
                artifact: artifact.coordinate.to_string(),
                server: artifact.repository.clone(),
            })
            .collect();

        debug!("Rendering manifest with {} servers and {} jars", servers.len(), jars.len());
        let mut context = TeraContext::new();
        context.insert("servers", &servers);
        context.insert("jars", &jars);
        self.tera.render(MANIFEST_TEMPLATE, &context).map_err(template_error)
    }

    /// Render one `java_library` per root.
    ///
    /// Roots are sorted by artifact name (ties by canonical coordinate);
    /// exports are sorted ascending.
    pub fn emit_build_declarations(
        &self,
        per_root: &BTreeMap<ArtifactCoordinate, DependencyClosure>,
    ) -> Result<String> {
        let mut roots: Vec<(&ArtifactCoordinate, &DependencyClosure)> = per_root.iter().collect();
        roots.sort_by(|(a, _), (b, _)| {
            a.artifact_id.cmp(&b.artifact_id).then_with(|| a.to_string().cmp(&b.to_string()))
        });

        for pair in roots.windows(2) {
            let (first, second) = (pair[0].0, pair[1].0);
            if first.artifact_id == second.artifact_id {
                return Err(BazelDepsError::NameCollision {
                    name: first.artifact_id.clone(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }

        let libraries: Vec<LibraryBlock> = roots
            .into_iter()
            .map(|(root, closure)| {
                let mut exports: Vec<String> =
                    closure.iter().map(|artifact| format!("@{}//jar", artifact.target_name())).collect();
                exports.sort();
                exports.dedup();
                LibraryBlock {
                    name: root.artifact_id.clone(),
                    exports,
                }
            })
            .collect();

        let mut context = TeraContext::new();
        context.insert("libraries", &libraries);
        self.tera.render(BUILD_TEMPLATE, &context).map_err(template_error)
    }
}

/// Fail when two distinct artifacts share a generated target name.
pub fn check_name_collisions<'a, I>(artifacts: I) -> Result<()>
where
    I: IntoIterator<Item = &'a ResolvedArtifact>,
{
    let mut seen: HashMap<String, &ResolvedArtifact> = HashMap::new();
    for artifact in artifacts {
        let name = artifact.target_name();
        match seen.get(&name) {
            Some(existing) if *existing != artifact => {
                let (first, second) = if existing <= &artifact {
                    (*existing, artifact)
                } else {
                    (artifact, *existing)
                };
                return Err(BazelDepsError::NameCollision {
                    name,
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
            Some(_) => {}
            None => {
                seen.insert(name, artifact);
            }
        }
    }
    Ok(())
}

fn template_error(error: tera::Error) -> BazelDepsError {
    let mut reason = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        reason.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    BazelDepsError::TemplateError {
        reason,
    }
}
