//! Audio artifact naming and public URLs

use rand::Rng;
use std::path::PathBuf;

const HOST: &str = "host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 7;

/// Build a unique artifact filename: `prefix_<millis>_<7 base36 chars>.ext`
///
/// # Examples
///
/// ```
/// use learnify::speech::artifact::make_filename;
///
/// let name = make_filename("learnify_audio", "mp3");
/// assert!(name.starts_with("learnify_audio_"));
/// assert!(name.ends_with(".mp3"));
/// ```
pub fn make_filename(prefix: &str, extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}.{}", prefix, millis, suffix, extension.trim_start_matches('.'))
}

/// Scheme and host the caller used to reach the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    /// `http` or `https`
    pub proto: String,
    /// Host and optional port
    pub host: String,
}

impl Default for RequestOrigin {
    fn default() -> Self {
        Self {
            proto: "http".to_string(),
            host: "localhost:5000".to_string(),
        }
    }
}

impl RequestOrigin {
    /// Create an origin from explicit parts
    pub fn new(proto: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            proto: proto.into(),
            host: host.into(),
        }
    }

    /// Derive the origin from `x-forwarded-proto` and `host` headers
    ///
    /// Missing or non-UTF-8 headers fall back to `http` and `localhost:5000`.
    pub fn from_headers(headers: &axum::http::HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let defaults = Self::default();
        Self {
            // A proxy chain may list several protocols; the first is the client's
            proto: header(X_FORWARDED_PROTO)
                .and_then(|p| p.split(',').next().map(|s| s.trim().to_string()))
                .unwrap_or(defaults.proto),
            host: header(HOST).unwrap_or(defaults.host),
        }
    }

    /// `proto://host`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.proto, self.host)
    }

    /// Absolute URL for a file served under `public_prefix`
    pub fn public_url(&self, public_prefix: &str, filename: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url(),
            public_prefix.trim_matches('/'),
            filename
        )
    }
}

/// A finished audio file for one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// File name within the audio directory
    pub filename: String,
    /// Location on disk
    pub path: PathBuf,
    /// Absolute URL clients fetch it from
    pub url: String,
    /// Size in bytes
    pub bytes: u64,
    /// Chunks appended
    pub chunks_written: usize,
    /// Chunks skipped
    pub chunks_failed: usize,
}
