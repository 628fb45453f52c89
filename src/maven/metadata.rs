//! `maven-metadata.xml` documents.
//!
//! Two flavours share one schema: the artifact-level listing of every published
//! version, and the version-level listing inside a `-SNAPSHOT` directory that
//! names the timestamped files.

use serde::Deserialize;

/// Root `<metadata>` element.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    pub versioning: Option<Versioning>,
}

/// `<versioning>` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioning {
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Option<VersionList>,
    pub snapshot: Option<Snapshot>,
    pub snapshot_versions: Option<SnapshotVersionList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionList {
    #[serde(default, rename = "version")]
    pub items: Vec<String>,
}

/// `<snapshot>` block of a version-level listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: Option<String>,
    pub build_number: Option<String>,
    pub local_copy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVersionList {
    #[serde(default, rename = "snapshotVersion")]
    pub items: Vec<SnapshotVersion>,
}

/// One file entry of `<snapshotVersions>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVersion {
    pub classifier: Option<String>,
    pub extension: Option<String>,
    pub value: Option<String>,
}

impl RepositoryMetadata {
    /// Parse metadata bytes. The error is the deserializer's message.
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_start_matches('\u{feff}');
        quick_xml::de::from_str(text).map_err(|e| e.to_string())
    }

    /// Every version listed, trimmed, in document order.
    pub fn versions(&self) -> Vec<String> {
        let Some(versioning) = &self.versioning else {
            return Vec::new();
        };
        let mut versions: Vec<String> = versioning
            .versions
            .iter()
            .flat_map(|list| list.items.iter())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        // Some repositories only fill in latest/release
        for extra in [&versioning.latest, &versioning.release].into_iter().flatten() {
            let extra = extra.trim();
            if !extra.is_empty() && !versions.iter().any(|v| v == extra) {
                versions.push(extra.to_string());
            }
        }
        versions
    }

    /// File version of a timestamped snapshot file.
    ///
    /// `base_version` is the `-SNAPSHOT` version of the directory. Returns
    /// `None` when the listing describes a non-timestamped (local copy) snapshot.
    pub fn snapshot_file_version(
        &self,
        base_version: &str,
        extension: &str,
        classifier: Option<&str>,
    ) -> Option<String> {
        let versioning = self.versioning.as_ref()?;

        let wanted_classifier = classifier.unwrap_or("");
        let listed = versioning
            .snapshot_versions
            .iter()
            .flat_map(|list| list.items.iter())
            .find(|sv| {
                sv.extension.as_deref().map(str::trim) == Some(extension)
                    && sv.classifier.as_deref().map_or("", str::trim) == wanted_classifier
            })
            .and_then(|sv| sv.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(value) = listed {
            return Some(value.to_string());
        }

        let snapshot = versioning.snapshot.as_ref()?;
        if snapshot.local_copy.as_deref().map(str::trim) == Some("true") {
            return None;
        }
        let timestamp = snapshot.timestamp.as_deref()?.trim();
        let build_number = snapshot.build_number.as_deref()?.trim();
        let base = base_version.strip_suffix("-SNAPSHOT").unwrap_or(base_version);
        Some(format!("{base}-{timestamp}-{build_number}"))
    }
}
