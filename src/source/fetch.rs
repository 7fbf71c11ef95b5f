//! Fetcher - loads raw image bytes from a local path or an HTTP(S) URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncReadExt;

/// Hard cap on image size, local or remote (15 MiB).
pub const MAX_IMAGE_BYTES: u64 = 15 << 20;

/// Overall timeout for a remote fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(12);

/// `User-Agent` sent with remote fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("trashgang-ascii/", env!("CARGO_PKG_VERSION"));

/// `Accept` header favoring image types.
pub const ACCEPT_IMAGES: &str = "image/avif,image/webp,image/apng,image/*;q=0.8,*/*;q=0.5";

/// Limits applied by a [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_bytes: u64,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
            timeout: FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Raw bytes plus a label describing where they came from.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    /// The URL, or the path after `~` expansion.
    pub label: String,
}

/// Loads image bytes with size and time bounds.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http_client: reqwest::Client,
    options: FetchOptions,
}

impl Fetcher {
    /// Create a fetcher with the default limits.
    pub fn new() -> Result<Self, AcquisitionError> {
        Self::with_options(FetchOptions::default())
    }

    /// Create a fetcher with custom limits.
    pub fn with_options(options: FetchOptions) -> Result<Self, AcquisitionError> {
        let http_client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(AcquisitionError::Client)?;

        Ok(Self {
            http_client,
            options,
        })
    }

    /// Limits in effect.
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Load bytes from `source`, a path or an `http(s)://` URL.
    pub async fn load(&self, source: &str) -> Result<Fetched, AcquisitionError> {
        if is_http(source) {
            let bytes = self.fetch_url(source).await?;
            Ok(Fetched {
                bytes,
                label: source.to_string(),
            })
        } else {
            let path = expand_home(source);
            let bytes = self.read_file(&path).await?;
            Ok(Fetched {
                bytes,
                label: path.display().to_string(),
            })
        }
    }

    /// GET `url`, streaming the body and enforcing the byte cap as it arrives.
    pub async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, AcquisitionError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| AcquisitionError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!("Fetching image from {}", parsed);
        let response = self
            .http_client
            .get(parsed)
            .header(reqwest::header::ACCEPT, ACCEPT_IMAGES)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::Status { status });
        }

        let limit = self.options.max_bytes;
        let too_large = || AcquisitionError::RemoteTooLarge {
            url: url.to_string(),
            limit,
        };

        // A declared length is only a hint; the streaming check below is what counts.
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.request_error(e))?;
            if bytes.len() as u64 + chunk.len() as u64 > limit {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }

    /// Read a local file, refusing anything over the byte cap.
    pub async fn read_file(&self, path: &Path) -> Result<Vec<u8>, AcquisitionError> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AcquisitionError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AcquisitionError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let limit = self.options.max_bytes;
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| AcquisitionError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        if bytes.len() as u64 > limit {
            return Err(AcquisitionError::FileTooLarge {
                path: path.to_path_buf(),
                limit,
            });
        }
        Ok(bytes)
    }

    fn request_error(&self, error: reqwest::Error) -> AcquisitionError {
        if error.is_timeout() {
            AcquisitionError::Timeout(self.options.timeout)
        } else {
            AcquisitionError::Request(error)
        }
    }
}

/// Whether `source` names an HTTP(S) resource.
pub fn is_http(source: &str) -> bool {
    let lower = source.get(..8).unwrap_or(source).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(source: &str) -> PathBuf {
    let rest = source
        .strip_prefix("~/")
        .or_else(|| source.strip_prefix(&format!("~{}", std::path::MAIN_SEPARATOR)));

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if source == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(source)),
        _ => PathBuf::from(source),
    }
}

/// Errors that can occur while acquiring image bytes.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("failed to set up HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("http request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("http request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("http status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file too large (> {limit} bytes)")]
    FileTooLarge { path: PathBuf, limit: u64 },

    #[error("remote image too large (> {limit} bytes)")]
    RemoteTooLarge { url: String, limit: u64 },
}

impl AcquisitionError {
    /// True for the local and remote size-cap failures.
    pub fn is_size_exceeded(&self) -> bool {
        matches!(
            self,
            AcquisitionError::FileTooLarge { .. } | AcquisitionError::RemoteTooLarge { .. }
        )
    }
}
