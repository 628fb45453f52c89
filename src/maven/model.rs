//! Project models: a POM with its parents folded in and expressions expanded.
//!
//! Building an effective model happens in stages, driven by the session that
//! can fetch documents:
//!
//! 1. [`ProjectModel::from_pom`] converts the raw document.
//! 2. [`ProjectModel::inherit`] folds in the (already assembled) parent.
//! 3. [`ProjectModel::interpolate`] expands `${...}` expressions.
//! 4. [`ProjectModel::import_management`] merges `scope=import` BOMs.
//! 5. [`ProjectModel::apply_management`] fills in managed versions and scopes.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::pom::{ParentRef, Pom, RawDependency};
use crate::artifact::ArtifactCoordinate;
use crate::constants::MAX_INTERPOLATION_PASSES;

static EXPRESSION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").ok());

/// `groupId:artifactId` pattern from `<exclusions>`; `*` matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    /// Whether this exclusion covers `group:artifact`.
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        (self.group_id == "*" || self.group_id == group_id)
            && (self.artifact_id == "*" || self.artifact_id == artifact_id)
    }
}

/// A dependency declaration after conversion from XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Version text; may be a range or missing until management is applied
    pub version: Option<String>,
    pub dependency_type: String,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    fn from_raw(raw: &RawDependency) -> Self {
        let text = |value: &Option<String>| {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        };
        Self {
            group_id: text(&raw.group_id).unwrap_or_default(),
            artifact_id: text(&raw.artifact_id).unwrap_or_default(),
            version: text(&raw.version),
            dependency_type: text(&raw.dependency_type).unwrap_or_else(|| "jar".to_string()),
            classifier: text(&raw.classifier),
            scope: text(&raw.scope),
            optional: raw.optional.as_deref().map(str::trim) == Some("true"),
            exclusions: raw
                .exclusions
                .iter()
                .flat_map(|list| list.items.iter())
                .map(|e| Exclusion {
                    group_id: text(&e.group_id).unwrap_or_else(|| "*".to_string()),
                    artifact_id: text(&e.artifact_id).unwrap_or_else(|| "*".to_string()),
                })
                .collect(),
        }
    }

    /// Identity used by inheritance and management (`group:artifact:type[:classifier]`).
    pub fn management_key(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.dependency_type, classifier
            ),
            None => format!("{}:{}:{}", self.group_id, self.artifact_id, self.dependency_type),
        }
    }

    /// Effective scope, `compile` when none is declared.
    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or("compile")
    }

    /// Whether this is a `scope=import` BOM reference.
    pub fn is_import(&self) -> bool {
        self.scope() == "import" && self.dependency_type == "pom"
    }

    /// Whether dependency collection follows this edge.
    pub fn is_collected_scope(&self) -> bool {
        !matches!(self.scope(), "test" | "provided" | "system" | "import")
    }

    /// Coordinate of the artifact this dependency points at.
    pub fn coordinate(&self, version: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::from_dependency(
            &self.group_id,
            &self.artifact_id,
            version,
            Some(&self.dependency_type),
            self.classifier.as_deref(),
        )
    }

    /// Fill in what `managed` declares and this dependency lacks.
    fn fill_from(&mut self, managed: &Dependency) {
        if self.version.is_none() {
            self.version.clone_from(&managed.version);
        }
        if self.scope.is_none() {
            self.scope.clone_from(&managed.scope);
        }
        self.merge_exclusions(&managed.exclusions);
    }

    /// Replace version and scope with `managed`'s, as the root's management does
    /// for transitive dependencies.
    pub fn override_from(&mut self, managed: &Dependency) {
        if managed.version.is_some() {
            self.version.clone_from(&managed.version);
        }
        if managed.scope.is_some() {
            self.scope.clone_from(&managed.scope);
        }
        self.merge_exclusions(&managed.exclusions);
    }

    fn merge_exclusions(&mut self, extra: &[Exclusion]) {
        for exclusion in extra {
            if !self.exclusions.contains(exclusion) {
                self.exclusions.push(exclusion.clone());
            }
        }
    }

    fn interpolate_with(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        let expand = |value: &mut String| *value = interpolate(value.as_str(), lookup);
        expand(&mut self.group_id);
        expand(&mut self.artifact_id);
        expand(&mut self.dependency_type);
        for value in [&mut self.version, &mut self.classifier, &mut self.scope].into_iter().flatten() {
            expand(value);
        }
        for exclusion in &mut self.exclusions {
            expand(&mut exclusion.group_id);
            expand(&mut exclusion.artifact_id);
        }
    }
}

/// A project model at any stage of assembly.
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    /// `<dependencyManagement>`, unique by management key, declaration order
    pub management: Vec<Dependency>,
    /// `<dependencies>`, unique by management key, declaration order
    pub dependencies: Vec<Dependency>,
}

impl ProjectModel {
    /// Convert a raw document; nothing is inherited or expanded yet.
    pub fn from_pom(pom: &Pom) -> Self {
        let text = |value: &Option<String>| {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        };
        let mut model = Self {
            group_id: text(&pom.group_id),
            artifact_id: text(&pom.artifact_id),
            version: text(&pom.version),
            packaging: text(&pom.packaging),
            parent: pom.parent.clone(),
            properties: pom
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.trim().to_string()))
                .collect(),
            management: Vec::new(),
            dependencies: Vec::new(),
        };
        for raw in pom.managed_items() {
            push_unique(&mut model.management, Dependency::from_raw(raw));
        }
        for raw in pom.dependency_items() {
            push_unique(&mut model.dependencies, Dependency::from_raw(raw));
        }
        model
    }

    /// Fold an assembled parent into this model. The child wins on every key.
    pub fn inherit(&mut self, parent: &ProjectModel) {
        if self.group_id.is_none() {
            self.group_id = self
                .parent
                .as_ref()
                .map(|p| p.group_id.trim().to_string())
                .or_else(|| parent.group_id.clone());
        }
        if self.version.is_none() {
            self.version = self
                .parent
                .as_ref()
                .map(|p| p.version.trim().to_string())
                .or_else(|| parent.version.clone());
        }

        for (key, value) in &parent.properties {
            self.properties.entry(key.clone()).or_insert_with(|| value.clone());
        }
        for managed in &parent.management {
            push_unique(&mut self.management, managed.clone());
        }
        for dependency in &parent.dependencies {
            push_unique(&mut self.dependencies, dependency.clone());
        }
    }

    /// Value of a `${...}` expression, if known.
    fn lookup(&self, expression: &str) -> Option<String> {
        let expression = expression.trim();
        let field = expression
            .strip_prefix("project.")
            .or_else(|| expression.strip_prefix("pom."))
            .unwrap_or(expression);
        match field {
            "groupId" => self.group_id.clone(),
            "artifactId" => self.artifact_id.clone(),
            "version" => self.version.clone(),
            "packaging" => Some(self.packaging.clone().unwrap_or_else(|| "jar".to_string())),
            "parent.groupId" => self.parent.as_ref().map(|p| p.group_id.trim().to_string()),
            "parent.artifactId" => self.parent.as_ref().map(|p| p.artifact_id.trim().to_string()),
            "parent.version" => self.parent.as_ref().map(|p| p.version.trim().to_string()),
            _ => self.properties.get(expression).cloned(),
        }
    }

    /// Expand `${...}` expressions in coordinates, management and dependencies.
    pub fn interpolate(&mut self) {
        let snapshot = self.clone();
        let lookup = |expr: &str| snapshot.lookup(expr);
        for field in [&mut self.group_id, &mut self.version].into_iter().flatten() {
            *field = interpolate(field.as_str(), &lookup);
        }

        // Later lookups see the expanded coordinates
        let snapshot = Self {
            management: Vec::new(),
            dependencies: Vec::new(),
            ..self.clone()
        };
        let lookup = |expr: &str| snapshot.lookup(expr);
        for dependency in self.management.iter_mut().chain(self.dependencies.iter_mut()) {
            dependency.interpolate_with(&lookup);
        }
    }

    /// BOM references in the management section, in declaration order.
    pub fn imports(&self) -> Vec<Dependency> {
        self.management.iter().filter(|d| d.is_import()).cloned().collect()
    }

    /// Replace `scope=import` entries with the management of the imported
    /// models. Existing keys are never overridden; earlier imports win.
    pub fn import_management<'a, I>(&mut self, imported: I)
    where
        I: IntoIterator<Item = &'a ProjectModel>,
    {
        self.management.retain(|d| !d.is_import());
        for bom in imported {
            for managed in &bom.management {
                push_unique(&mut self.management, managed.clone());
            }
        }
    }

    /// The management entry for a dependency, if any.
    pub fn managed(&self, dependency: &Dependency) -> Option<&Dependency> {
        let key = dependency.management_key();
        self.management.iter().find(|m| m.management_key() == key)
    }

    /// Fill missing versions, scopes and exclusions of direct dependencies.
    pub fn apply_management(&mut self) {
        let management = std::mem::take(&mut self.management);
        for dependency in &mut self.dependencies {
            let key = dependency.management_key();
            if let Some(managed) = management.iter().find(|m| m.management_key() == key) {
                dependency.fill_from(managed);
            }
        }
        self.management = management;
    }
}

fn push_unique(list: &mut Vec<Dependency>, dependency: Dependency) {
    let key = dependency.management_key();
    if !list.iter().any(|d| d.management_key() == key) {
        list.push(dependency);
    }
}

/// Expand `${...}` in `value` until nothing changes. Unknown expressions stay verbatim.
pub fn interpolate(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut current = value.to_string();
    let Some(expression) = EXPRESSION.as_ref() else {
        return current;
    };
    for _ in 0..MAX_INTERPOLATION_PASSES {
        if !current.contains("${") {
            break;
        }
        let next = expression
            .replace_all(&current, |caps: &regex::Captures<'_>| {
                lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pom(xml: &str) -> ProjectModel {
        ProjectModel::from_pom(&Pom::parse(xml.as_bytes()).unwrap())
    }

    #[test]
    fn test_interpolate_properties_and_project_fields() {
        let mut model = pom(r#"<project>
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1.2.0</version>
  <properties>
    <base.version>3.1</base.version>
    <lib.version>${base.version}.4</lib.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>${project.groupId}</groupId>
      <artifactId>core</artifactId>
      <version>${project.version}</version>
    </dependency>
    <dependency>
      <groupId>org.lib</groupId>
      <artifactId>lib</artifactId>
      <version>${lib.version}</version>
    </dependency>
    <dependency>
      <groupId>org.lib</groupId>
      <artifactId>other</artifactId>
      <version>${undefined.version}</version>
    </dependency>
  </dependencies>
</project>"#);
        model.interpolate();

        assert_eq!(model.dependencies[0].group_id, "org.example");
        assert_eq!(model.dependencies[0].version.as_deref(), Some("1.2.0"));
        assert_eq!(model.dependencies[1].version.as_deref(), Some("3.1.4"));
        assert_eq!(model.dependencies[2].version.as_deref(), Some("${undefined.version}"));
    }

    #[test]
    fn test_self_referential_property_terminates() {
        let lookup = |expr: &str| (expr == "a").then(|| "${a}x".to_string());
        let result = interpolate("${a}", &lookup);
        assert!(result.starts_with("${a}"));
    }

    #[test]
    fn test_inherit_from_parent() {
        let mut parent = pom(r#"<project>
  <groupId>org.parent</groupId>
  <artifactId>parent</artifactId>
  <version>7</version>
  <properties><shared>1.0</shared><overridden>parent</overridden></properties>
  <dependencyManagement><dependencies>
    <dependency><groupId>g</groupId><artifactId>managed</artifactId><version>${shared}</version></dependency>
  </dependencies></dependencyManagement>
  <dependencies>
    <dependency><groupId>g</groupId><artifactId>inherited</artifactId><version>2.0</version></dependency>
    <dependency><groupId>g</groupId><artifactId>both</artifactId><version>1.0</version></dependency>
  </dependencies>
</project>"#);
        parent.interpolate();

        let mut child = pom(r#"<project>
  <parent><groupId>org.parent</groupId><artifactId>parent</artifactId><version>7</version></parent>
  <artifactId>child</artifactId>
  <properties><overridden>child</overridden></properties>
  <dependencies>
    <dependency><groupId>g</groupId><artifactId>both</artifactId><version>3.0</version></dependency>
    <dependency><groupId>g</groupId><artifactId>managed</artifactId></dependency>
  </dependencies>
</project>"#);
        child.inherit(&parent);
        child.interpolate();
        child.apply_management();

        assert_eq!(child.group_id.as_deref(), Some("org.parent"));
        assert_eq!(child.version.as_deref(), Some("7"));
        assert_eq!(child.properties.get("overridden").map(String::as_str), Some("child"));

        let versions: Vec<(&str, Option<&str>)> = child
            .dependencies
            .iter()
            .map(|d| (d.artifact_id.as_str(), d.version.as_deref()))
            .collect();
        assert_eq!(
            versions,
            vec![("both", Some("3.0")), ("managed", Some("1.0")), ("inherited", Some("2.0"))]
        );
    }

    #[test]
    fn test_import_management_does_not_override() {
        let mut model = pom(r#"<project>
  <dependencyManagement><dependencies>
    <dependency><groupId>g</groupId><artifactId>a</artifactId><version>1.0</version></dependency>
    <dependency><groupId>bom</groupId><artifactId>bom</artifactId><version>1</version><type>pom</type><scope>import</scope></dependency>
  </dependencies></dependencyManagement>
  <dependencies>
    <dependency><groupId>g</groupId><artifactId>a</artifactId></dependency>
    <dependency><groupId>g</groupId><artifactId>b</artifactId></dependency>
  </dependencies>
</project>"#);
        let bom = pom(r#"<project>
  <dependencyManagement><dependencies>
    <dependency><groupId>g</groupId><artifactId>a</artifactId><version>9.9</version></dependency>
    <dependency><groupId>g</groupId><artifactId>b</artifactId><version>2.0</version><scope>runtime</scope></dependency>
  </dependencies></dependencyManagement>
</project>"#);

        assert_eq!(model.imports().len(), 1);
        model.import_management([&bom]);
        model.apply_management();

        assert!(model.imports().is_empty());
        assert_eq!(model.dependencies[0].version.as_deref(), Some("1.0"));
        assert_eq!(model.dependencies[1].version.as_deref(), Some("2.0"));
        assert_eq!(model.dependencies[1].scope(), "runtime");
    }

    #[test]
    fn test_dependency_scopes_and_exclusions() {
        let model = pom(r#"<project><dependencies>
  <dependency><groupId>g</groupId><artifactId>t</artifactId><scope>test</scope></dependency>
  <dependency><groupId>g</groupId><artifactId>o</artifactId><optional>true</optional>
    <exclusions><exclusion><groupId>x</groupId><artifactId>*</artifactId></exclusion></exclusions>
  </dependency>
  <dependency><groupId>g</groupId><artifactId>tj</artifactId><type>test-jar</type></dependency>
</dependencies></project>"#);

        assert!(!model.dependencies[0].is_collected_scope());
        assert!(model.dependencies[1].is_collected_scope());
        assert!(model.dependencies[1].optional);
        assert!(model.dependencies[1].exclusions[0].matches("x", "anything"));
        assert!(!model.dependencies[1].exclusions[0].matches("y", "anything"));
        assert_eq!(model.dependencies[2].coordinate("1").to_string(), "g:tj:jar:tests:1");
        assert_eq!(model.dependencies[2].management_key(), "g:tj:test-jar");
    }
}
