//! Test environment setup and management
//!
//! This module provides on-disk Maven repositories and a cache directory for
//! integration and library tests. Repositories are plain directories in the
//! Maven 2 layout, reachable through `file://` URLs.

use anyhow::{Context, Result};
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::{PomBuilder, metadata_xml};
use crate::repository::layout::{artifact_path, pom_path, versions_metadata_path};

/// Test environment with any number of local repositories and one cache.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub cache_dir: PathBuf,
    pub config_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment
    pub fn new() -> Result<Self> {
        // Initialize test logging if RUST_LOG is set
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let cache_dir = temp_dir.path().join("cache");
        let config_path = temp_dir.path().join("config.toml");
        fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            temp_dir,
            cache_dir,
            config_path,
        })
    }

    /// Create (or reuse) a repository directory named `name`.
    pub fn repository(&self, name: &str) -> Result<TestRepository> {
        let root = self.temp_dir.path().join("repos").join(name);
        fs::create_dir_all(&root).with_context(|| format!("creating {}", root.display()))?;
        Ok(TestRepository {
            root,
        })
    }

    /// Write the global configuration file used with `--config`.
    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(&self.config_path, content).with_context(|| format!("writing {}", self.config_path.display()))
    }

    /// Files currently in the cache, relative to the cache root.
    pub fn cached_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(&self.cache_dir, &self.cache_dir, &mut files);
        files.sort();
        files
    }
}

fn collect_files(base: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(base, &path, files);
        } else if let Ok(relative) = path.strip_prefix(base) {
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// A Maven 2 layout directory.
#[derive(Debug, Clone)]
pub struct TestRepository {
    root: PathBuf,
}

impl TestRepository {
    /// Directory of the repository.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// `file://` URL of the repository.
    pub fn url(&self) -> String {
        Url::from_directory_path(&self.root)
            .map(|url| url.to_string())
            .unwrap_or_else(|()| format!("file://{}/", self.root.display()))
    }

    /// Write a file at a repository-relative path.
    pub fn put(&self, path: &str, content: impl AsRef<[u8]>) -> Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content).with_context(|| format!("writing {}", target.display()))
    }

    /// Publish a POM and a matching jar.
    pub fn publish(&self, pom: &PomBuilder) -> Result<()> {
        self.publish_pom(pom)?;
        let coordinate = pom.coordinate();
        self.put(&artifact_path(&coordinate, &coordinate.version), b"PK\x03\x04")
    }

    /// Publish only the POM.
    pub fn publish_pom(&self, pom: &PomBuilder) -> Result<()> {
        let coordinate = pom.coordinate();
        self.put(&pom_path(&coordinate, &coordinate.version), pom.build())
    }

    /// Publish only the jar of `group:artifact:version`.
    pub fn publish_jar(&self, coordinate: &str) -> Result<()> {
        let coordinate: crate::artifact::ArtifactCoordinate = coordinate.parse()?;
        self.put(&artifact_path(&coordinate, &coordinate.version), b"PK\x03\x04")
    }

    /// Publish the version listing of `group:artifact`.
    pub fn publish_versions(&self, group_id: &str, artifact_id: &str, versions: &[&str]) -> Result<()> {
        self.put(&versions_metadata_path(group_id, artifact_id), metadata_xml(versions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_layout_on_disk() {
        let env = TestEnvironment::new().unwrap();
        let repo = env.repository("local").unwrap();
        repo.publish(&PomBuilder::new("org.example:lib:1.0")).unwrap();

        assert!(repo.path().join("org/example/lib/1.0/lib-1.0.pom").exists());
        assert!(repo.path().join("org/example/lib/1.0/lib-1.0.jar").exists());
        assert!(repo.url().starts_with("file://"));
        assert!(repo.url().ends_with('/'));
    }
}
