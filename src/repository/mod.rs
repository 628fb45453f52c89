//! Repository registry.
//!
//! The registry is the ordered chain of Maven repositories a run resolves
//! against. Order is fallback priority: metadata and artifacts are requested
//! from the first repository, then the next, until one answers.
//!
//! # Entry Format
//!
//! Repositories are configured as text entries:
//!
//! - `https://repo.example.com/maven2/` - bare location, gets the positional
//!   identifier `uri<n>` where `n` is the entry's index
//! - `corp@https://nexus.example.com/repository/maven/` - explicit identifier
//! - `/home/me/.m2/repository` - local directory, converted to a `file://` URL
//!
//! # Default Repository
//!
//! Maven Central (`central`) is appended unless an entry already points at the
//! same canonical location. A bare entry pointing at Central takes the
//! `central` identifier, so the default identifier is registered exactly once.

pub mod layout;

use reqwest::Url;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::constants::{DEFAULT_REPOSITORY_ID, DEFAULT_REPOSITORY_URL, POSITIONAL_REPOSITORY_PREFIX};
use crate::core::{BazelDepsError, Result};

/// One repository from which artifacts may be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    /// Unique identifier, reported as provenance (`server = "..."`)
    pub id: String,
    /// Canonical base location, always ending with `/`
    pub url: Url,
}

impl RepositoryDescriptor {
    /// Create a descriptor, canonicalizing the location.
    pub fn new(id: impl Into<String>, location: &str) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            url: canonical_location(location)?,
        })
    }

    /// The default public repository.
    pub fn central() -> Result<Self> {
        Self::new(DEFAULT_REPOSITORY_ID, DEFAULT_REPOSITORY_URL)
    }

    /// Absolute URL of a repository-relative path.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.url.join(path).map_err(|e| BazelDepsError::ConfigError {
            message: format!("cannot build URL for '{path}' in repository '{}': {e}", self.id),
        })
    }

    /// Location with any password replaced, safe for logs and error messages.
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }

    /// Whether the repository is served from the local filesystem.
    pub fn is_local(&self) -> bool {
        self.url.scheme() == "file"
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.redacted_url())
    }
}

/// A parsed repository entry, before identifiers are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    /// Explicit identifier from `id@location`, if any
    pub id: Option<String>,
    /// Raw location text
    pub location: String,
}

impl RepositoryEntry {
    /// Entry with an explicit identifier.
    pub fn named(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            location: location.into(),
        }
    }

    /// Entry that receives a positional identifier.
    pub fn bare(location: impl Into<String>) -> Self {
        Self {
            id: None,
            location: location.into(),
        }
    }
}

impl FromStr for RepositoryEntry {
    type Err = BazelDepsError;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        let config_error = |message: String| BazelDepsError::ConfigError {
            message,
        };

        if input.is_empty() {
            return Err(config_error("repository entry is empty".to_string()));
        }

        // `id@location`, unless the '@' belongs to credentials inside a URL
        if let Some((prefix, location)) = input.split_once('@')
            && !prefix.contains(':')
            && !prefix.contains('/')
        {
            if prefix.is_empty() {
                return Err(config_error(format!("repository entry '{input}' has an empty identifier")));
            }
            if location.trim().is_empty() {
                return Err(config_error(format!(
                    "repository entry '{input}' has no location"
                )));
            }
            return Ok(Self::named(prefix, location.trim()));
        }

        Ok(Self::bare(input))
    }
}

/// Ordered, read-only chain of repositories for one run.
#[derive(Debug, Clone)]
pub struct RepositoryRegistry {
    repositories: Vec<RepositoryDescriptor>,
}

impl RepositoryRegistry {
    /// Build a registry from configured entries, appending Maven Central.
    pub fn build(entries: &[RepositoryEntry]) -> Result<Self> {
        Self::build_with_default(entries, RepositoryDescriptor::central()?)
    }

    /// Build a registry with an explicit default repository.
    ///
    /// Entries are appended in order. Exact duplicates are dropped; an
    /// identifier reused for a different location is a
    /// [`BazelDepsError::ConfigError`]. Any entry at the default location
    /// takes the default identifier, so the default appears exactly once.
    pub fn build_with_default(
        entries: &[RepositoryEntry],
        default: RepositoryDescriptor,
    ) -> Result<Self> {
        let mut repositories: Vec<RepositoryDescriptor> = Vec::with_capacity(entries.len() + 1);

        for (index, entry) in entries.iter().enumerate() {
            let url = canonical_location(&entry.location)?;
            let id = match &entry.id {
                _ if url == default.url => {
                    if let Some(id) = entry.id.as_deref().filter(|id| *id != default.id) {
                        debug!("Repository '{}' is the default location, using '{}'", id, default.id);
                    }
                    default.id.clone()
                }
                Some(id) => id.clone(),
                None => format!("{POSITIONAL_REPOSITORY_PREFIX}{index}"),
            };

            if id == default.id && url != default.url {
                return Err(BazelDepsError::ConfigError {
                    message: format!(
                        "repository identifier '{id}' is reserved for {}",
                        default.redacted_url()
                    ),
                });
            }

            if let Some(existing) = repositories.iter().find(|r| r.id == id) {
                if existing.url == url {
                    debug!("Ignoring duplicate repository entry {}", existing);
                    continue;
                }
                return Err(BazelDepsError::ConfigError {
                    message: format!(
                        "repository identifier '{id}' is used for both {} and {}",
                        existing.redacted_url(),
                        redact(&url)
                    ),
                });
            }

            if entry.id.is_none() && repositories.iter().any(|r| r.url == url) {
                debug!("Ignoring repeated repository location {}", redact(&url));
                continue;
            }

            repositories.push(RepositoryDescriptor {
                id,
                url,
            });
        }

        if !repositories.iter().any(|r| r.id == default.id) {
            repositories.push(default);
        }

        Ok(Self {
            repositories,
        })
    }

    /// Repositories in fallback order.
    pub fn list(&self) -> &[RepositoryDescriptor] {
        &self.repositories
    }

    /// Iterate over the repositories in fallback order.
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryDescriptor> {
        self.repositories.iter()
    }

    /// Find a repository by identifier.
    pub fn lookup(&self, id: &str) -> Result<&RepositoryDescriptor> {
        self.repositories.iter().find(|r| r.id == id).ok_or_else(|| {
            BazelDepsError::RepositoryNotFound {
                id: id.to_string(),
            }
        })
    }

    /// Identifiers in fallback order.
    pub fn ids(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.id.clone()).collect()
    }

    /// Number of registered repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether the registry is empty (never true for registries built with a default).
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

/// Canonicalize a repository location.
///
/// Accepts `http`, `https` and `file` URLs as well as absolute filesystem
/// paths. The result always ends with `/` so relative paths join below it.
pub fn canonical_location(location: &str) -> Result<Url> {
    let location = location.trim();
    if location.is_empty() {
        return Err(BazelDepsError::ConfigError {
            message: "repository location is empty".to_string(),
        });
    }

    let mut url = if Path::new(location).is_absolute() && !location.contains("://") {
        Url::from_directory_path(location).map_err(|()| BazelDepsError::ConfigError {
            message: format!("invalid repository path '{location}'"),
        })?
    } else {
        Url::parse(location).map_err(|e| BazelDepsError::ConfigError {
            message: format!("invalid repository location '{location}': {e}"),
        })?
    };

    match url.scheme() {
        "http" | "https" | "file" => {}
        other => {
            return Err(BazelDepsError::ConfigError {
                message: format!("unsupported repository scheme '{other}' in '{}'", redact(&url)),
            });
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Render a URL with its password masked.
pub fn redact(url: &Url) -> String {
    if url.password().is_some() {
        let mut masked = url.clone();
        let _ = masked.set_password(Some("***"));
        masked.to_string()
    } else {
        url.to_string()
    }
}
