//! Archive retrieval.
//!
//! A [`Fetcher`] writes the full content of a URL to a local file. The
//! default [`SchemeFetcher`] downloads `http(s)://` URLs and copies
//! `file://` URLs or plain paths.

use std::fs;
use std::path::Path;

use super::ThemeError;

/// Default user agent for theme downloads.
pub const DEFAULT_USER_AGENT: &str = concat!("themer/", env!("CARGO_PKG_VERSION"));

/// Retrieves a resource into a local file.
pub trait Fetcher {
    /// Writes the content of `url` to `dest`, returning the byte count.
    ///
    /// An empty resource is an error.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError> {
        (**self).fetch(url, dest)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError> {
        (**self).fetch(url, dest)
    }
}

/// Blocking HTTP(S) downloader.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

impl HttpFetcher {
    /// Creates a downloader that identifies itself as `user_agent`.
    #[must_use]
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError> {
        tracing::debug!(url, dest = %dest.display(), "Downloading theme archive");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ThemeError::fetch(url, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ThemeError::fetch(
                url,
                format!("server returned {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .map_err(|e| ThemeError::fetch(url, format!("failed to read response: {}", e)))?;

        if bytes.is_empty() {
            return Err(ThemeError::fetch(url, "empty response"));
        }

        fs::write(dest, &bytes).map_err(|e| ThemeError::fs("write archive", dest, e))?;

        Ok(bytes.len() as u64)
    }
}

/// Copies archives from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFetcher;

impl LocalFetcher {
    /// Strips a `file://` prefix, leaving a filesystem path.
    #[must_use]
    pub fn local_path(url: &str) -> &Path {
        Path::new(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError> {
        let source = Self::local_path(url);

        let meta = fs::metadata(source).map_err(|e| ThemeError::fetch(url, e.to_string()))?;
        if !meta.is_file() {
            return Err(ThemeError::fetch(url, "not a regular file"));
        }
        if meta.len() == 0 {
            return Err(ThemeError::fetch(url, "empty file"));
        }

        tracing::debug!(source = %source.display(), dest = %dest.display(), "Copying theme archive");
        fs::copy(source, dest).map_err(|e| ThemeError::fs("copy archive", dest, e))
    }
}

/// Dispatches on the URL scheme.
#[derive(Default)]
pub struct SchemeFetcher {
    http: HttpFetcher,
    local: LocalFetcher,
}

impl SchemeFetcher {
    /// Creates a dispatcher whose HTTP side uses `user_agent`.
    #[must_use]
    pub fn new(user_agent: &str) -> Self {
        Self {
            http: HttpFetcher::new(user_agent),
            local: LocalFetcher,
        }
    }
}

impl Fetcher for SchemeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError> {
        match url.split_once("://") {
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("http") => self.http.fetch(url, dest),
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("https") => {
                self.http.fetch(url, dest)
            }
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("file") => {
                self.local.fetch(url, dest)
            }
            Some((scheme, _)) => Err(ThemeError::fetch(
                url,
                format!("unsupported URL scheme: {}", scheme),
            )),
            None => self.local.fetch(url, dest),
        }
    }
}
