//! Maven 2 repository layout.
//!
//! Paths are relative to a repository's base location:
//!
//! ```text
//! com/google/guava/guava/18.0/guava-18.0.pom
//! com/google/guava/guava/18.0/guava-18.0.jar
//! com/google/guava/guava/maven-metadata.xml
//! ```

use crate::artifact::ArtifactCoordinate;
use crate::constants::MAVEN_METADATA_FILE;

fn group_path(group_id: &str) -> String {
    group_id.replace('.', "/")
}

/// Directory holding every version of `group:artifact`.
pub fn artifact_dir(group_id: &str, artifact_id: &str) -> String {
    format!("{}/{}", group_path(group_id), artifact_id)
}

/// Directory holding one version of an artifact.
pub fn version_dir(coordinate: &ArtifactCoordinate) -> String {
    format!("{}/{}", artifact_dir(&coordinate.group_id, &coordinate.artifact_id), coordinate.version)
}

/// Path of an artifact file.
///
/// `file_version` differs from the coordinate's version only for timestamped
/// snapshots (`1.0-20240101.120000-3` instead of `1.0-SNAPSHOT`).
pub fn artifact_path(coordinate: &ArtifactCoordinate, file_version: &str) -> String {
    let classifier = coordinate.classifier.as_deref().map(|c| format!("-{c}")).unwrap_or_default();
    format!(
        "{}/{}-{}{}.{}",
        version_dir(coordinate),
        coordinate.artifact_id,
        file_version,
        classifier,
        coordinate.extension
    )
}

/// Path of the POM describing an artifact.
pub fn pom_path(coordinate: &ArtifactCoordinate, file_version: &str) -> String {
    artifact_path(&coordinate.pom(), file_version)
}

/// Path of the version listing of `group:artifact`.
pub fn versions_metadata_path(group_id: &str, artifact_id: &str) -> String {
    format!("{}/{}", artifact_dir(group_id, artifact_id), MAVEN_METADATA_FILE)
}

/// Path of the snapshot listing inside a `-SNAPSHOT` version directory.
pub fn snapshot_metadata_path(coordinate: &ArtifactCoordinate) -> String {
    format!("{}/{}", version_dir(coordinate), MAVEN_METADATA_FILE)
}
