//! Maven artifact coordinates.
//!
//! Coordinates are written `group:artifact[:extension[:classifier]]:version` on
//! the command line and rendered canonically as
//! `group:artifact:extension[:classifier]:version`. The canonical form is what
//! exclusion sets are matched against and what ends up in `maven_jar` lines.

use std::fmt;
use std::str::FromStr;

use crate::core::BazelDepsError;

/// Extension used when a coordinate does not name one.
pub const DEFAULT_EXTENSION: &str = "jar";

/// A resolved point coordinate of one Maven artifact.
///
/// This is never a version range: equality covers every field, including the
/// version.
///
/// ```
/// use bazel_deps::artifact::ArtifactCoordinate;
///
/// let coord: ArtifactCoordinate = "com.google.guava:guava:18.0".parse().unwrap();
/// assert_eq!(coord.extension, "jar");
/// assert_eq!(coord.to_string(), "com.google.guava:guava:jar:18.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactCoordinate {
    /// Group identifier (`com.google.guava`)
    pub group_id: String,
    /// Artifact (name) identifier (`guava`)
    pub artifact_id: String,
    /// Packaging extension (`jar`, `pom`, `war`, ...)
    pub extension: String,
    /// Optional classifier (`sources`, `tests`, `jdk8`, ...)
    pub classifier: Option<String>,
    /// Exact version (`18.0`, `1.0-SNAPSHOT`)
    pub version: String,
}

impl ArtifactCoordinate {
    /// Create a `jar` coordinate without classifier.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            classifier: None,
            version: version.into(),
        }
    }

    /// Build a coordinate from the fields of a POM `<dependency>`.
    ///
    /// The dependency `type` is mapped to an extension and, for a few well-known
    /// types, an implied classifier. An explicit classifier always wins.
    pub fn from_dependency(
        group_id: &str,
        artifact_id: &str,
        version: &str,
        dependency_type: Option<&str>,
        classifier: Option<&str>,
    ) -> Self {
        let (extension, implied_classifier) = type_to_extension(dependency_type.unwrap_or("jar"));
        let classifier = classifier
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| implied_classifier.map(str::to_string));

        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            extension: extension.to_string(),
            classifier,
            version: version.to_string(),
        }
    }

    /// Return a copy with another extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Return a copy with a classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// The coordinate of the POM describing this artifact.
    #[must_use]
    pub fn pom(&self) -> Self {
        Self {
            extension: "pom".to_string(),
            classifier: None,
            ..self.clone()
        }
    }

    /// Version-less identity used for mediation (`group:artifact:extension[:classifier]`).
    pub fn versionless_key(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, classifier
            ),
            None => format!("{}:{}:{}", self.group_id, self.artifact_id, self.extension),
        }
    }

    /// Whether the version is a `-SNAPSHOT`.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with("-SNAPSHOT")
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = BazelDepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| BazelDepsError::InvalidCoordinate {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let input = s.trim();
        if input.chars().any(char::is_whitespace) {
            return Err(invalid("coordinates may not contain whitespace"));
        }

        let parts: Vec<&str> = input.split(':').collect();
        let (group_id, artifact_id, extension, classifier, version) = match parts.as_slice() {
            [group, artifact, version] => (*group, *artifact, "", "", *version),
            [group, artifact, extension, version] => (*group, *artifact, *extension, "", *version),
            [group, artifact, extension, classifier, version] => {
                (*group, *artifact, *extension, *classifier, *version)
            }
            _ => {
                return Err(invalid(
                    "expected group:artifact[:extension[:classifier]]:version",
                ));
            }
        };

        if group_id.is_empty() {
            return Err(invalid("group identifier is empty"));
        }
        if artifact_id.is_empty() {
            return Err(invalid("artifact identifier is empty"));
        }
        if version.is_empty() {
            return Err(invalid("version is empty"));
        }

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            extension: if extension.is_empty() {
                DEFAULT_EXTENSION.to_string()
            } else {
                extension.to_string()
            },
            classifier: (!classifier.is_empty()).then(|| classifier.to_string()),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

/// Map a POM dependency `type` to its file extension and implied classifier.
pub fn type_to_extension(dependency_type: &str) -> (&str, Option<&'static str>) {
    match dependency_type {
        "" | "jar" | "maven-plugin" | "ejb" | "bundle" => ("jar", None),
        "test-jar" => ("jar", Some("tests")),
        "ejb-client" => ("jar", Some("client")),
        "java-source" => ("jar", Some("sources")),
        "javadoc" => ("jar", Some("javadoc")),
        other => (other, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_segments() {
        let coord: ArtifactCoordinate =
            "com.fasterxml.jackson.core:jackson-databind:2.5.0".parse().unwrap();
        assert_eq!(coord.group_id, "com.fasterxml.jackson.core");
        assert_eq!(coord.artifact_id, "jackson-databind");
        assert_eq!(coord.extension, "jar");
        assert_eq!(coord.classifier, None);
        assert_eq!(coord.version, "2.5.0");
        assert_eq!(coord.to_string(), "com.fasterxml.jackson.core:jackson-databind:jar:2.5.0");
    }

    #[test]
    fn test_parse_with_extension_and_classifier() {
        let coord: ArtifactCoordinate = "io.netty:netty-tcnative:jar:linux-x86_64:2.0.0".parse().unwrap();
        assert_eq!(coord.classifier.as_deref(), Some("linux-x86_64"));
        assert_eq!(coord.to_string(), "io.netty:netty-tcnative:jar:linux-x86_64:2.0.0");

        let coord: ArtifactCoordinate = "org.example:bom:pom:1.0".parse().unwrap();
        assert_eq!(coord.extension, "pom");
        assert_eq!(coord.to_string(), "org.example:bom:pom:1.0");
    }

    #[test]
    fn test_empty_extension_defaults_to_jar() {
        let coord: ArtifactCoordinate = "g:a::sources:1.0".parse().unwrap();
        assert_eq!(coord.extension, "jar");
        assert_eq!(coord.classifier.as_deref(), Some("sources"));
    }

    #[test]
    fn test_canonical_forms_agree() {
        let short: ArtifactCoordinate = "g:a:1.0".parse().unwrap();
        let long: ArtifactCoordinate = "g:a:jar:1.0".parse().unwrap();
        assert_eq!(short, long);
        assert_eq!(short.to_string(), long.to_string());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "g", "g:a", ":a:1.0", "g::1.0", "g:a:", "a:b:c:d:e:f", "g:a b:1.0"] {
            let err = input.parse::<ArtifactCoordinate>().unwrap_err();
            assert!(
                matches!(err, BazelDepsError::InvalidCoordinate { .. }),
                "expected InvalidCoordinate for {input:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_from_dependency_type_mapping() {
        let coord = ArtifactCoordinate::from_dependency("g", "a", "1", Some("test-jar"), None);
        assert_eq!(coord.to_string(), "g:a:jar:tests:1");

        let coord = ArtifactCoordinate::from_dependency("g", "a", "1", Some("test-jar"), Some("it"));
        assert_eq!(coord.classifier.as_deref(), Some("it"));

        let coord = ArtifactCoordinate::from_dependency("g", "a", "1", Some("pom"), None);
        assert_eq!(coord.extension, "pom");

        let coord = ArtifactCoordinate::from_dependency("g", "a", "1", Some("bundle"), Some(""));
        assert_eq!(coord.to_string(), "g:a:jar:1");
    }

    #[test]
    fn test_versionless_key_ignores_version() {
        let a = ArtifactCoordinate::new("g", "a", "1.0");
        let b = ArtifactCoordinate::new("g", "a", "2.0");
        assert_eq!(a.versionless_key(), b.versionless_key());
        assert_ne!(a.versionless_key(), a.clone().with_classifier("tests").versionless_key());
    }
}
