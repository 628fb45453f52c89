//! Test fixtures for creating POM and metadata documents
//!
//! [`PomBuilder`] renders a minimal but well-formed `pom.xml`; dependencies are
//! described with [`DependencySpec`].

use std::fmt::Write as _;

use crate::artifact::ArtifactCoordinate;

fn split_coordinate(coordinate: &str) -> (String, String, Option<String>) {
    let mut parts = coordinate.splitn(3, ':');
    let group = parts.next().unwrap_or_default().to_string();
    let artifact = parts.next().unwrap_or_default().to_string();
    let version = parts.next().map(str::to_string);
    (group, artifact, version)
}

/// A `<dependency>` entry.
#[derive(Clone, Debug)]
pub struct DependencySpec {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub dependency_type: Option<String>,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<(String, String)>,
}

impl DependencySpec {
    /// `group:artifact[:version]`; the version may be a range or an expression.
    pub fn new(coordinate: &str) -> Self {
        let (group_id, artifact_id, version) = split_coordinate(coordinate);
        Self {
            group_id,
            artifact_id,
            version,
            dependency_type: None,
            classifier: None,
            scope: None,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_type(mut self, dependency_type: &str) -> Self {
        self.dependency_type = Some(dependency_type.to_string());
        self
    }

    pub fn classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    /// Add a `group:artifact` exclusion (`*` allowed).
    pub fn exclude(mut self, pattern: &str) -> Self {
        let (group, artifact) = pattern.split_once(':').unwrap_or((pattern, "*"));
        self.exclusions.push((group.to_string(), artifact.to_string()));
        self
    }

    fn render(&self, out: &mut String, indent: &str) {
        let _ = writeln!(out, "{indent}<dependency>");
        let _ = writeln!(out, "{indent}  <groupId>{}</groupId>", self.group_id);
        let _ = writeln!(out, "{indent}  <artifactId>{}</artifactId>", self.artifact_id);
        let optional_fields = [
            ("version", self.version.as_deref()),
            ("type", self.dependency_type.as_deref()),
            ("classifier", self.classifier.as_deref()),
            ("scope", self.scope.as_deref()),
            ("optional", self.optional.then_some("true")),
        ];
        for (name, value) in optional_fields {
            if let Some(value) = value {
                let _ = writeln!(out, "{indent}  <{name}>{value}</{name}>");
            }
        }
        if !self.exclusions.is_empty() {
            let _ = writeln!(out, "{indent}  <exclusions>");
            for (group, artifact) in &self.exclusions {
                let _ = writeln!(
                    out,
                    "{indent}    <exclusion><groupId>{group}</groupId><artifactId>{artifact}</artifactId></exclusion>"
                );
            }
            let _ = writeln!(out, "{indent}  </exclusions>");
        }
        let _ = writeln!(out, "{indent}</dependency>");
    }
}

/// Builder for `pom.xml` test documents.
#[derive(Clone, Debug)]
pub struct PomBuilder {
    group_id: String,
    artifact_id: String,
    version: String,
    packaging: Option<String>,
    parent: Option<(String, String, String)>,
    properties: Vec<(String, String)>,
    managed: Vec<DependencySpec>,
    dependencies: Vec<DependencySpec>,
}

impl PomBuilder {
    /// Start a POM for `group:artifact:version`.
    pub fn new(coordinate: &str) -> Self {
        let (group_id, artifact_id, version) = split_coordinate(coordinate);
        Self {
            group_id,
            artifact_id,
            version: version.unwrap_or_default(),
            packaging: None,
            parent: None,
            properties: Vec::new(),
            managed: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn parent(mut self, coordinate: &str) -> Self {
        let (group, artifact, version) = split_coordinate(coordinate);
        self.parent = Some((group, artifact, version.unwrap_or_default()));
        self
    }

    pub fn packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }

    pub fn dependency(mut self, dependency: DependencySpec) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn managed(mut self, dependency: DependencySpec) -> Self {
        self.managed.push(dependency);
        self
    }

    /// Import the management of a BOM (`scope=import`, `type=pom`).
    pub fn import(self, coordinate: &str) -> Self {
        self.managed(DependencySpec::new(coordinate).with_type("pom").scope("import"))
    }

    /// The jar coordinate this POM describes.
    pub fn coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate::new(&self.group_id, &self.artifact_id, &self.version)
    }

    /// Render the document.
    pub fn build(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <modelVersion>4.0.0</modelVersion>\n",
        );
        if let Some((group, artifact, version)) = &self.parent {
            let _ = writeln!(
                out,
                "  <parent>\n    <groupId>{group}</groupId>\n    <artifactId>{artifact}</artifactId>\n    <version>{version}</version>\n  </parent>"
            );
        }
        let _ = writeln!(out, "  <groupId>{}</groupId>", self.group_id);
        let _ = writeln!(out, "  <artifactId>{}</artifactId>", self.artifact_id);
        let _ = writeln!(out, "  <version>{}</version>", self.version);
        if let Some(packaging) = &self.packaging {
            let _ = writeln!(out, "  <packaging>{packaging}</packaging>");
        }
        if !self.properties.is_empty() {
            out.push_str("  <properties>\n");
            for (name, value) in &self.properties {
                let _ = writeln!(out, "    <{name}>{value}</{name}>");
            }
            out.push_str("  </properties>\n");
        }
        if !self.managed.is_empty() {
            out.push_str("  <dependencyManagement>\n    <dependencies>\n");
            for dependency in &self.managed {
                dependency.render(&mut out, "      ");
            }
            out.push_str("    </dependencies>\n  </dependencyManagement>\n");
        }
        if !self.dependencies.is_empty() {
            out.push_str("  <dependencies>\n");
            for dependency in &self.dependencies {
                dependency.render(&mut out, "    ");
            }
            out.push_str("  </dependencies>\n");
        }
        out.push_str("</project>\n");
        out
    }
}

/// Render an artifact-level `maven-metadata.xml` listing `versions`.
pub fn metadata_xml(versions: &[&str]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata>\n  <versioning>\n    <versions>\n");
    for version in versions {
        let _ = writeln!(out, "      <version>{version}</version>");
    }
    out.push_str("    </versions>\n  </versioning>\n</metadata>\n");
    out
}
