//! `http://` and `https://` repositories.
//!
//! Requests that fail with connection errors, timeouts, HTTP 429 or 5xx are
//! retried with exponential backoff (`tokio-retry`). 404 and 410 mean the file
//! is absent and are returned immediately. Credentials embedded in a repository
//! URL are sent as basic auth by reqwest and never appear in logs or errors.

use reqwest::{Client, Response, StatusCode, Url};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, warn};

use super::Transport;
use crate::cache::{persist, staging_file};
use crate::constants::{
    DEFAULT_HTTP_RETRIES, DEFAULT_HTTP_TIMEOUT, DEFAULT_USER_AGENT, MAX_BACKOFF_DELAY_MS,
    STARTING_BACKOFF_DELAY_MS,
};
use crate::core::{BazelDepsError, Result};
use crate::repository::{RepositoryDescriptor, redact};

/// Knobs for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures
    pub retries: usize,
    /// `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            retries: DEFAULT_HTTP_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    retries: usize,
}

/// Outcome of one attempt: `Err` is transient and retried, `Ok(Err)` is final.
type Attempt = std::result::Result<Result<Option<Response>>, BazelDepsError>;

impl HttpTransport {
    /// Build the client.
    pub fn new(options: HttpOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| BazelDepsError::ConfigError {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            retries: options.retries,
        })
    }

    async fn attempt(&self, url: &Url) -> Attempt {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                let error = network_error(url, e);
                debug!("Transient failure: {}", error);
                return Err(error);
            }
            Err(e) => return Ok(Err(network_error(url, e))),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(Ok(None));
        }
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            debug!("Transient HTTP {} for {}", status, redact(url));
            return Err(BazelDepsError::NetworkError {
                url: redact(url),
                reason: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Ok(Err(BazelDepsError::NetworkError {
                url: redact(url),
                reason: format!("HTTP {status}"),
            }));
        }
        Ok(Ok(Some(response)))
    }

    /// Send a GET with retries; `None` when the server reports the file absent.
    async fn send(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Response>> {
        let url = repository.resolve(path)?;
        debug!("GET {}", redact(&url));

        let strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
            .max_delay(Duration::from_millis(MAX_BACKOFF_DELAY_MS))
            .take(self.retries);

        match Retry::spawn(strategy, || self.attempt(&url)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Giving up on {} after {} retries: {}", redact(&url), self.retries, e);
                Err(e)
            }
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, repository: &RepositoryDescriptor, path: &str) -> Result<Option<Vec<u8>>> {
        let Some(response) = self.send(repository, path).await? else {
            return Ok(None);
        };
        let url = response.url().clone();
        let bytes = response.bytes().await.map_err(|e| network_error(&url, e))?;
        Ok(Some(bytes.to_vec()))
    }

    async fn download(
        &self,
        repository: &RepositoryDescriptor,
        path: &str,
        destination: &Path,
    ) -> Result<bool> {
        let Some(mut response) = self.send(repository, path).await? else {
            return Ok(false);
        };
        let url = response.url().clone();

        let staging = staging_file(destination)?;
        let mut file = tokio::fs::File::from_std(staging.reopen()?);
        while let Some(chunk) = response.chunk().await.map_err(|e| network_error(&url, e))? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        persist(staging, destination)?;
        Ok(true)
    }
}

fn network_error(url: &Url, error: reqwest::Error) -> BazelDepsError {
    BazelDepsError::NetworkError {
        url: redact(url),
        reason: error.without_url().to_string(),
    }
}
