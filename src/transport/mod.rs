//! Repository transports.
//!
//! A [`Transport`] fetches files from one repository by repository-relative
//! path. It knows nothing about POMs or coordinates; absence is reported as
//! `None`/`false` so callers can fall back to the next repository, while real
//! failures (connection refused, HTTP 500 after retries, unreadable file) are
//! errors.
//!
//! The implementation is picked per repository from its location's scheme:
//! `http`/`https` use [`HttpTransport`], `file` uses [`FileTransport`].
//! [`RepositoryTransport`] does the dispatch.

mod file;
mod http;

pub use file::FileTransport;
pub use http::{HttpOptions, HttpTransport};

use std::future::Future;
use std::path::Path;

use crate::core::Result;
use crate::repository::RepositoryDescriptor;

/// Capability to read files from a repository.
pub trait Transport {
    /// Fetch a small document (POM, version listing).
    ///
    /// Returns `Ok(None)` when the repository does not have the file.
    fn get(
        &self,
        repository: &RepositoryDescriptor,
        path: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>>>;

    /// Download a file to `destination`, replacing it atomically.
    ///
    /// Returns `Ok(false)` when the repository does not have the file.
    fn download(
        &self,
        repository: &RepositoryDescriptor,
        path: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<bool>>;
}

/// Scheme-dispatching transport used by the CLI.
#[derive(Debug, Clone)]
pub struct RepositoryTransport {
    http: HttpTransport,
    file: FileTransport,
}

impl RepositoryTransport {
    /// Build the HTTP client and pair it with the filesystem transport.
    pub fn new(options: HttpOptions) -> Result<Self> {
        Ok(Self {
            http: HttpTransport::new(options)?,
            file: FileTransport,
        })
    }
}

impl Transport for RepositoryTransport {
    async fn get(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Vec<u8>>> {
        if repository.is_local() {
            self.file.get(repository, path).await
        } else {
            self.http.get(repository, path).await
        }
    }

    async fn download(
        &self,
        repository: &RepositoryDescriptor,
        path: &str,
        destination: &Path,
    ) -> Result<bool> {
        if repository.is_local() {
            self.file.download(repository, path, destination).await
        } else {
            self.http.download(repository, path, destination).await
        }
    }
}
