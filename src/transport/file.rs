//! `file://` repositories.

use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::debug;

use super::Transport;
use crate::cache::{persist, staging_file};
use crate::core::{BazelDepsError, Result};
use crate::repository::RepositoryDescriptor;

/// Reads repositories laid out on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    fn local_path(repository: &RepositoryDescriptor, path: &str) -> Result<PathBuf> {
        let url = repository.resolve(path)?;
        url.to_file_path().map_err(|()| BazelDepsError::ConfigError {
            message: format!("'{url}' is not a local path"),
        })
    }
}

impl Transport for FileTransport {
    async fn get(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Vec<u8>>> {
        let local = Self::local_path(repository, path)?;
        match async_fs::read(&local).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not present in {}", path, repository.id);
                Ok(None)
            }
            Err(e) => Err(BazelDepsError::NetworkError {
                url: local.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn download(
        &self,
        repository: &RepositoryDescriptor,
        path: &str,
        destination: &Path,
    ) -> Result<bool> {
        let local = Self::local_path(repository, path)?;
        if !async_fs::try_exists(&local).await.unwrap_or(false) {
            debug!("{} not present in {}", path, repository.id);
            return Ok(false);
        }

        let destination = destination.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let mut staging = staging_file(&destination)?;
            let mut source = std::fs::File::open(&local)?;
            std::io::copy(&mut source, staging.as_file_mut())?;
            persist(staging, &destination)?;
            Ok(true)
        })
        .await
        .map_err(|e| BazelDepsError::Other {
            message: format!("copy task failed: {e}"),
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use tempfile::TempDir;

    fn local_repo(dir: &Path) -> RepositoryDescriptor {
        let url = Url::from_directory_path(dir).unwrap();
        RepositoryDescriptor::new("local", url.as_str()).unwrap()
    }

    #[tokio::test]
    async fn test_get_present_and_missing() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("g/a/1")).unwrap();
        std::fs::write(temp.path().join("g/a/1/a-1.pom"), "<project/>").unwrap();
        let repo = local_repo(temp.path());

        let found = FileTransport.get(&repo, "g/a/1/a-1.pom").await.unwrap();
        assert_eq!(found.as_deref(), Some(&b"<project/>"[..]));
        assert!(FileTransport.get(&repo, "g/a/2/a-2.pom").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_download_copies_file() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        std::fs::create_dir_all(source.path().join("g/a/1")).unwrap();
        std::fs::write(source.path().join("g/a/1/a-1.jar"), b"PK").unwrap();
        let repo = local_repo(source.path());

        let destination = target.path().join("nested/a-1.jar");
        assert!(FileTransport.download(&repo, "g/a/1/a-1.jar", &destination).await.unwrap());
        assert_eq!(std::fs::read(&destination).unwrap(), b"PK");

        let missing = target.path().join("a-2.jar");
        assert!(!FileTransport.download(&repo, "g/a/2/a-2.jar", &missing).await.unwrap());
        assert!(!missing.exists());
    }
}
