//! In-memory repository transport.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::fixtures::PomBuilder;
use crate::artifact::ArtifactCoordinate;
use crate::cache::{persist, staging_file};
use crate::core::{BazelDepsError, Result};
use crate::repository::RepositoryDescriptor;
use crate::repository::layout::{artifact_path, pom_path};
use crate::transport::Transport;

/// Transport serving files from memory, keyed by repository id and path.
///
/// Every request is recorded as `<id>:<path>` so tests can assert what was
/// (or was not) fetched. Repositories marked with [`fail_repository`](Self::fail_repository)
/// answer every request with a `NetworkError`.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    files: RefCell<HashMap<(String, String), Vec<u8>>>,
    failing: RefCell<HashSet<String>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file.
    pub fn put(&self, repository: &str, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert((repository.to_string(), path.to_string()), bytes.into());
    }

    /// Publish a POM and a matching jar.
    pub fn publish(&self, repository: &str, pom: &PomBuilder) {
        self.publish_pom(repository, pom);
        let coordinate = pom.coordinate();
        self.put(repository, &artifact_path(&coordinate, &coordinate.version), b"PK\x03\x04".to_vec());
    }

    /// Publish only the POM.
    pub fn publish_pom(&self, repository: &str, pom: &PomBuilder) {
        let coordinate = pom.coordinate();
        self.put(repository, &pom_path(&coordinate, &coordinate.version), pom.build());
    }

    /// Publish only a jar for `group:artifact:version`.
    pub fn put_jar(&self, repository: &str, coordinate: &str) {
        let coordinate: ArtifactCoordinate = coordinate.parse().unwrap_or_else(|e| panic!("bad coordinate: {e}"));
        self.put(repository, &artifact_path(&coordinate, &coordinate.version), b"PK\x03\x04".to_vec());
    }

    /// Make every request to `repository` fail.
    pub fn fail_repository(&self, repository: &str) {
        self.failing.borrow_mut().insert(repository.to_string());
    }

    /// Requests made so far, as `<id>:<path>`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Number of requests whose path contains `fragment`.
    pub fn request_count(&self, fragment: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.contains(fragment)).count()
    }

    fn lookup(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Vec<u8>>> {
        self.requests.borrow_mut().push(format!("{}:{}", repository.id, path));
        if self.failing.borrow().contains(&repository.id) {
            return Err(BazelDepsError::NetworkError {
                url: repository.redacted_url(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.files.borrow().get(&(repository.id.clone(), path.to_string())).cloned())
    }
}

impl Transport for MemoryTransport {
    async fn get(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Vec<u8>>> {
        self.lookup(repository, path)
    }

    async fn download(&self, repository: &RepositoryDescriptor, path: &str, destination: &Path) -> Result<bool> {
        let Some(bytes) = self.lookup(repository, path)? else {
            return Ok(false);
        };
        let mut staging = staging_file(destination)?;
        std::io::Write::write_all(&mut staging, &bytes)?;
        persist(staging, destination)?;
        Ok(true)
    }
}
