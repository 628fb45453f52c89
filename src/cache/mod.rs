//! Local resolution cache.
//!
//! Downloaded POMs and artifacts are kept on disk so that repeated runs do not
//! hit the network again. The cache is also the scratch area downloads are
//! staged in before being moved into place.
//!
//! # Cache Directory Structure
//!
//! Each repository gets its own tree, so a cached file always remembers which
//! repository supplied it:
//!
//! ```text
//! ~/.cache/bazel-deps/
//! ├── central-3f2a9c01b7d4/                 # <id>-<sha256(location)[..12]>
//! │   └── com/google/guava/guava/18.0/
//! │       ├── guava-18.0.pom
//! │       └── guava-18.0.jar
//! └── corp-a81be02c5e11/
//!     └── ...
//! ```
//!
//! Version listings (`maven-metadata.xml`) change over time and are never
//! cached. The cache assumes a single writer; concurrent runs sharing one
//! directory are not coordinated.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs as async_fs;
use tracing::debug;

use crate::constants::{CACHE_DIR_NAME, FALLBACK_CACHE_DIR, MAVEN_METADATA_FILE};
use crate::core::{BazelDepsError, Result};
use crate::repository::RepositoryDescriptor;

/// On-disk cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    /// Use `dir` as cache root. Nothing is created until [`ensure_cache_dir`](Self::ensure_cache_dir).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    /// Platform default cache root (`<cache dir>/bazel-deps`, or `/tmp/bazel-deps-repo`).
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|dir| dir.join(CACHE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
    }

    /// Cache root directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache root if it does not exist yet.
    pub async fn ensure_cache_dir(&self) -> Result<()> {
        async_fs::create_dir_all(&self.dir).await.map_err(|e| BazelDepsError::ConfigError {
            message: format!("cache directory {} is not writable: {e}", self.dir.display()),
        })
    }

    /// Directory holding everything fetched from one repository.
    pub fn repository_dir(&self, repository: &RepositoryDescriptor) -> PathBuf {
        let digest = hex::encode(Sha256::digest(repository.url.as_str().as_bytes()));
        let id: String = repository
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(format!("{id}-{}", &digest[..12]))
    }

    /// Location of a repository-relative path inside the cache.
    pub fn path_for(&self, repository: &RepositoryDescriptor, path: &str) -> PathBuf {
        let mut target = self.repository_dir(repository);
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != "." && *s != "..") {
            target.push(segment);
        }
        target
    }

    /// Whether a file may be served from the cache.
    pub fn is_cacheable(path: &str) -> bool {
        !path.ends_with(MAVEN_METADATA_FILE)
    }

    /// Read a cached file, `None` when it is not cached.
    pub async fn read(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Vec<u8>>> {
        if !Self::is_cacheable(path) {
            return Ok(None);
        }
        let target = self.path_for(repository, path);
        match async_fs::read(&target).await {
            Ok(bytes) => {
                debug!("Cache hit for {} in {}", path, repository.id);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a file is already cached.
    pub async fn contains(&self, repository: &RepositoryDescriptor, path: &str) -> bool {
        Self::is_cacheable(path)
            && async_fs::try_exists(self.path_for(repository, path)).await.unwrap_or(false)
    }

    /// Store bytes atomically.
    pub async fn store(&self, repository: &RepositoryDescriptor, path: &str, bytes: &[u8]) -> Result<()> {
        if !Self::is_cacheable(path) {
            return Ok(());
        }
        let target = self.path_for(repository, path);
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut staging = staging_file(&target)?;
            std::io::Write::write_all(&mut staging, &bytes)?;
            persist(staging, &target)
        })
        .await
        .map_err(|e| BazelDepsError::Other {
            message: format!("cache write task failed: {e}"),
        })?
    }
}

/// Create a temporary file next to `destination` for an atomic write.
pub fn staging_file(destination: &Path) -> Result<NamedTempFile> {
    let parent = destination.parent().ok_or_else(|| BazelDepsError::Other {
        message: format!("{} has no parent directory", destination.display()),
    })?;
    std::fs::create_dir_all(parent)?;
    Ok(NamedTempFile::new_in(parent)?)
}

/// Move a staged file into place.
pub fn persist(staging: NamedTempFile, destination: &Path) -> Result<()> {
    staging.persist(destination).map_err(|e| BazelDepsError::IoError(e.error))?;
    Ok(())
}
