//! Ordered assembly of upstream audio chunks into one file
//!
//! Chunks are fetched and appended strictly one after another: chunk `i`
//! is fully written before chunk `i + 1` is requested. Audio concatenation
//! depends on that order and appends to a single destination cannot be
//! interleaved. Failed chunks are skipped, never retried.

use crate::error::{LearnifyError, Result};
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Hosts trusted to serve synthesized audio
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &["translate.google.com", "translate.googleapis.com"];

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const TTS_REFERER: &str = "https://translate.google.com";

/// Allowlist guard for outbound chunk fetches
#[derive(Debug, Clone)]
pub struct HostAllowlist {
    hosts: Vec<String>,
}

impl HostAllowlist {
    /// Create an allowlist from host names (compared case-insensitively)
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Whether the URL's host is on the list
    pub fn is_allowed(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| self.hosts.iter().any(|h| h.eq_ignore_ascii_case(host)))
            .unwrap_or(false)
    }

    /// Parse a location and confirm it may be fetched
    ///
    /// # Errors
    ///
    /// Returns `LearnifyError::Fetch` for unparsable or non-HTTP locations and
    /// `LearnifyError::HostNotAllowed` for hosts outside the list
    pub fn check(&self, location: &str) -> Result<Url> {
        let url = Url::parse(location)
            .map_err(|e| LearnifyError::Fetch(format!("Invalid audio location: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(LearnifyError::Fetch(format!(
                "Unsupported URL scheme: {}",
                url.scheme()
            ))
            .into());
        }

        if !self.is_allowed(&url) {
            let host = url.host_str().unwrap_or_default().to_string();
            return Err(LearnifyError::HostNotAllowed(host).into());
        }

        Ok(url)
    }
}

impl Default for HostAllowlist {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_HOSTS)
    }
}

/// A chunk that could not be appended
#[derive(Debug, Clone)]
pub struct ChunkFailure {
    /// Position of the chunk in the input sequence
    pub index: usize,
    /// The upstream location
    pub location: String,
    /// Why it failed
    pub reason: String,
    /// Whether the allowlist rejected it before any request was sent
    pub rejected: bool,
}

/// What an assembly run wrote
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    /// The artifact path
    pub destination: PathBuf,
    /// Indices of chunks appended, in order
    pub written: Vec<usize>,
    /// Chunks skipped
    pub failed: Vec<ChunkFailure>,
    /// Total bytes appended
    pub bytes_written: u64,
}

impl AssemblyReport {
    /// Whether no chunk was written; no artifact exists in that case
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Fetches chunk locations in order and appends them to one file
#[derive(Clone)]
pub struct AudioAssembler {
    client: reqwest::Client,
    allowlist: Arc<HostAllowlist>,
}

impl AudioAssembler {
    /// Create an assembler
    ///
    /// # Arguments
    ///
    /// * `allowlist` - Hosts chunks (and their redirects) may come from
    /// * `timeout` - Timeout for each chunk request
    /// * `max_redirects` - Redirects followed per chunk
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(allowlist: HostAllowlist, timeout: Duration, max_redirects: usize) -> Result<Self> {
        let allowlist = Arc::new(allowlist);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect_policy(Arc::clone(&allowlist), max_redirects))
            .build()
            .map_err(|e| LearnifyError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Fetch every location in order and append it to `destination`
    ///
    /// Any file already at `destination` is removed first. When no chunk
    /// succeeds the destination is removed again and the report is empty.
    ///
    /// # Errors
    ///
    /// Returns error only when the destination itself cannot be prepared;
    /// chunk failures are recorded in the report
    pub async fn assemble(&self, locations: &[String], destination: &Path) -> Result<AssemblyReport> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        remove_if_exists(destination).await?;

        let mut report = AssemblyReport {
            destination: destination.to_path_buf(),
            written: Vec::new(),
            failed: Vec::new(),
            bytes_written: 0,
        };

        for (index, location) in locations.iter().enumerate() {
            match self.append_chunk(location, destination).await {
                Ok(bytes) => {
                    tracing::debug!("Appended chunk {} ({} bytes)", index, bytes);
                    crate::metrics::record_chunk("written");
                    report.written.push(index);
                    report.bytes_written += bytes;
                }
                Err(e) => {
                    let rejected = is_rejection(&e);
                    tracing::warn!("Failed to append chunk {}: {}", index, e);
                    crate::metrics::record_chunk(if rejected { "rejected" } else { "failed" });
                    report.failed.push(ChunkFailure {
                        index,
                        location: location.clone(),
                        reason: e.to_string(),
                        rejected,
                    });
                }
            }
        }

        if report.is_empty() {
            if let Err(e) = remove_if_exists(destination).await {
                tracing::warn!("Failed to remove empty audio file {}: {}", destination.display(), e);
            }
        }

        Ok(report)
    }

    async fn append_chunk(&self, location: &str, destination: &Path) -> Result<u64> {
        let url = self.allowlist.check(location)?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(REFERER, TTS_REFERER)
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| {
                redirect_rejection(&e)
                    .unwrap_or_else(|| LearnifyError::Fetch(format!("Failed to fetch chunk: {}", e)))
            })?;

        let status = response.status();
        if !(200..400).contains(&status.as_u16()) {
            return Err(LearnifyError::Fetch(format!("HTTP {} for chunk", status.as_u16())).into());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .await?;
        let start_len = file.metadata().await?.len();

        match stream_body(response, &mut file).await {
            Ok(written) => Ok(written),
            Err(e) => {
                // A partial chunk must not reach the artifact
                file.set_len(start_len).await?;
                Err(e)
            }
        }
    }
}

async fn stream_body(response: reqwest::Response, file: &mut tokio::fs::File) -> Result<u64> {
    let mut body = response.bytes_stream();
    let mut written = 0u64;
    while let Some(piece) = body.next().await {
        let bytes: Bytes =
            piece.map_err(|e| LearnifyError::Fetch(format!("Chunk body interrupted: {}", e)))?;
        file.write_all(&bytes).await?;
        written += bytes.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Recover an allowlist refusal raised from inside the redirect policy
fn redirect_rejection(err: &reqwest::Error) -> Option<LearnifyError> {
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if let Some(LearnifyError::HostNotAllowed(host)) = e.downcast_ref::<LearnifyError>() {
            return Some(LearnifyError::HostNotAllowed(host.clone()));
        }
        source = e.source();
    }
    None
}

fn is_rejection(err: &anyhow::Error) -> bool {
    err.chain().any(|e| {
        matches!(
            e.downcast_ref::<LearnifyError>(),
            Some(LearnifyError::HostNotAllowed(_))
        )
    })
}

fn redirect_policy(allowlist: Arc<HostAllowlist>, max_redirects: usize) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error(format!("too many redirects (max {})", max_redirects));
        }
        if !allowlist.is_allowed(attempt.url()) {
            let host = attempt.url().host_str().unwrap_or_default().to_string();
            return attempt.error(LearnifyError::HostNotAllowed(host));
        }
        attempt.follow()
    })
}

async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
